use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use metatube_client::ImageKind;

#[derive(Parser, Debug)]
#[command(name = "metatube")]
#[command(about = "MetaTube metadata server client", long_about = None)]
pub struct Args {
    /// Config file (toml, yaml or json)
    #[arg(long, short, env = "METATUBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// MetaTube server URL, overrides the config file
    #[arg(long, env = "METATUBE_SERVER")]
    pub server: Option<String>,

    /// API token, overrides the config file
    #[arg(long, env = "METATUBE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Actor details
    Actor {
        provider: String,
        id: String,
        /// Expedited lookup
        #[arg(long)]
        lazy: bool,
    },

    /// Movie details
    Movie {
        provider: String,
        id: String,
        /// Expedited lookup
        #[arg(long)]
        lazy: bool,
    },

    /// Search actors by name
    SearchActors {
        q: String,
        /// Restrict to one provider
        #[arg(long, default_value = "")]
        provider: String,
        /// Do not fall back to other providers on a miss
        #[arg(long)]
        no_fallback: bool,
    },

    /// Search movies by number or title
    SearchMovies {
        q: String,
        /// Restrict to one provider
        #[arg(long, default_value = "")]
        provider: String,
        /// Do not fall back to other providers on a miss
        #[arg(long)]
        no_fallback: bool,
    },

    /// Print an image URL (no request is sent)
    ImageUrl {
        #[arg(value_enum)]
        kind: ImageKindArg,
        provider: String,
        id: String,
        /// External source image for the server to transform
        #[arg(long)]
        url: Option<String>,
        /// Aspect ratio; defaults per image kind
        #[arg(long, allow_hyphen_values = true)]
        ratio: Option<f64>,
        /// Crop position, -1 for server default
        #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
        pos: f64,
        /// Let the server pick the crop position
        #[arg(long)]
        auto: bool,
        /// Badge overlay
        #[arg(long, default_value = "")]
        badge: String,
    },

    /// Translate text
    Translate {
        q: String,
        #[arg(long, default_value = "auto")]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        engine: String,
        /// Engine parameter as key=value, repeatable
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Fetch raw image bytes
    FetchImage {
        url: String,
        /// Write the body here instead of printing response metadata
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ImageKindArg {
    Primary,
    Thumb,
    Backdrop,
}

impl From<ImageKindArg> for ImageKind {
    fn from(kind: ImageKindArg) -> Self {
        match kind {
            ImageKindArg::Primary => Self::Primary,
            ImageKindArg::Thumb => Self::Thumb,
            ImageKindArg::Backdrop => Self::Backdrop,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
