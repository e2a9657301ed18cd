mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use metatube_client::{
    build_http_client, logging, ImageOptions, MetadataApi, MetatubeClient, Settings, SharedConfig,
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cli::{Args, Command};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration (file < env < command line)
    let mut settings =
        Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(server) = args.server {
        settings.server.base_url = server;
    }
    if let Some(token) = args.token {
        settings.server.token = token;
    }
    if settings.server.base_url.trim().is_empty() {
        anyhow::bail!(
            "MetaTube server URL is not configured (use --server or METATUBE__SERVER__BASE_URL)"
        );
    }

    // 2. Initialize logging
    logging::init_logging(&settings.logging)?;
    debug!("Using MetaTube server {}", settings.server.base_url);

    // 3. One transport for the whole process
    let http = build_http_client(&settings.http)?;
    let client = MetatubeClient::new(http, SharedConfig::new(settings.server));

    // 4. Ctrl-C cancels the in-flight request
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            trigger.cancel();
        }
    });

    run(&client, args.command, &cancel).await
}

async fn run(api: &dyn MetadataApi, command: Command, cancel: &CancellationToken) -> Result<()> {
    match command {
        Command::Actor { provider, id, lazy } => {
            print_json(&api.get_actor_info(&provider, &id, lazy, cancel).await?)
        }
        Command::Movie { provider, id, lazy } => {
            print_json(&api.get_movie_info(&provider, &id, lazy, cancel).await?)
        }
        Command::SearchActors { q, provider, no_fallback } => {
            print_json(&api.search_actor(&q, &provider, !no_fallback, cancel).await?)
        }
        Command::SearchMovies { q, provider, no_fallback } => {
            print_json(&api.search_movie(&q, &provider, !no_fallback, cancel).await?)
        }
        Command::ImageUrl { kind, provider, id, url, ratio, pos, auto, badge } => {
            let mut options = ImageOptions::default().position(pos).auto(auto).badge(badge);
            options.ratio = ratio;
            println!("{}", api.image_url(kind.into(), &provider, &id, url.as_deref(), &options));
            Ok(())
        }
        Command::Translate { q, from, to, engine, params } => {
            let extra: Vec<(&str, &str)> =
                params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            print_json(&api.translate(&q, &from, &to, &engine, &extra, cancel).await?)
        }
        Command::FetchImage { url, output } => {
            let response = api.get_image_response(&url, cancel).await?;
            info!(
                "Image response: status={}, type={:?}, length={:?}",
                response.status, response.content_type, response.content_length
            );

            let Some(path) = output else {
                println!("status: {}", response.status);
                println!("content-type: {}", response.content_type.as_deref().unwrap_or("-"));
                println!(
                    "content-length: {}",
                    response.content_length.map_or_else(|| "-".to_string(), |l| l.to_string())
                );
                for (name, value) in &response.headers {
                    println!("{name}: {}", value.to_str().unwrap_or("<binary>"));
                }
                return Ok(());
            };

            if !response.is_success() {
                anyhow::bail!("Image request failed with status {}", response.status);
            }

            let mut file = tokio::fs::File::create(&path)
                .await
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut body = response.into_stream();
            let mut written = 0usize;
            loop {
                let chunk = tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        return Err(metatube_client::MetatubeError::Cancelled.into());
                    }
                    chunk = body.next() => chunk,
                };
                let Some(chunk) = chunk else { break };
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len();
            }
            file.flush().await?;
            info!("Wrote {} bytes to {}", written, path.display());
            Ok(())
        }
    }
}
