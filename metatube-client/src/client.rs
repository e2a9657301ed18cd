//! MetaTube HTTP Client
//!
//! All info, search and translate calls go through `get_data`, which sends
//! one GET, decodes the `{data, error}` envelope and maps failures.

use std::sync::Arc;

use reqwest::{
    header::{HeaderValue, ACCEPT, AUTHORIZATION},
    Client, StatusCode,
};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::{ConfigSource, HttpConfig, ServerConfig};
use crate::error::{bytes_with_limit, MetatubeError};
use crate::types::{
    ActorInfo, ActorSearchResult, ApiResponse, ErrorEnvelope, MovieInfo, MovieSearchResult,
    TranslationInfo,
};
use crate::urls::{self, ImageKind, ImageOptions};

/// Build the connection-pooled transport shared by every client.
///
/// Build it once per process and hand clones to [`MetatubeClient::new`].
/// No overall request timeout is set; callers bound latency with their
/// cancellation token.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, MetatubeError> {
    let client = Client::builder()
        .connect_timeout(config.connect_timeout())
        .pool_idle_timeout(config.pool_idle_timeout())
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .tcp_keepalive(config.tcp_keepalive())
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// MetaTube HTTP Client
///
/// Cheap to clone; clones share the connection pool and configuration source.
#[derive(Clone)]
pub struct MetatubeClient {
    http: Client,
    config: Arc<dyn ConfigSource>,
}

impl std::fmt::Debug for MetatubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetatubeClient")
            .field("base_url", &self.config.snapshot().base_url)
            .finish_non_exhaustive()
    }
}

impl MetatubeClient {
    /// Create a client over an existing transport.
    pub fn new(http: Client, config: impl ConfigSource + 'static) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> ServerConfig {
        self.config.snapshot()
    }

    pub(crate) const fn http(&self) -> &Client {
        &self.http
    }

    /// Get actor details from `/v1/actors/{provider}/{id}`
    pub async fn get_actor_info(
        &self,
        provider: &str,
        id: &str,
        lazy: bool,
        cancel: &CancellationToken,
    ) -> Result<ActorInfo, MetatubeError> {
        let config = self.config.snapshot();
        let url = urls::actor_info_url(config.base(), provider, id, lazy);
        self.get_data(&url, &config, true, cancel).await
    }

    /// Get movie details from `/v1/movies/{provider}/{id}`
    pub async fn get_movie_info(
        &self,
        provider: &str,
        id: &str,
        lazy: bool,
        cancel: &CancellationToken,
    ) -> Result<MovieInfo, MetatubeError> {
        let config = self.config.snapshot();
        let url = urls::movie_info_url(config.base(), provider, id, lazy);
        self.get_data(&url, &config, true, cancel).await
    }

    /// Search actors by name
    ///
    /// An empty `provider` searches every provider the server knows.
    pub async fn search_actor(
        &self,
        q: &str,
        provider: &str,
        fallback: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActorSearchResult>, MetatubeError> {
        let config = self.config.snapshot();
        let url = urls::search_actor_url(config.base(), q, provider, fallback);
        self.get_data(&url, &config, true, cancel).await
    }

    /// Search movies by number or title
    pub async fn search_movie(
        &self,
        q: &str,
        provider: &str,
        fallback: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSearchResult>, MetatubeError> {
        let config = self.config.snapshot();
        let url = urls::search_movie_url(config.base(), q, provider, fallback);
        self.get_data(&url, &config, true, cancel).await
    }

    /// Translate text with the given engine
    ///
    /// `extra` carries engine-specific credentials such as app ids and keys.
    pub async fn translate(
        &self,
        q: &str,
        from: &str,
        to: &str,
        engine: &str,
        extra: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<TranslationInfo, MetatubeError> {
        let config = self.config.snapshot();
        let url = urls::translate_url(config.base(), q, from, to, engine, extra);
        self.get_data(&url, &config, true, cancel).await
    }

    /// Image URL for any kind; `source_url: None` points at the image the
    /// server already has for this item.
    #[must_use]
    pub fn image_url(
        &self,
        kind: ImageKind,
        provider: &str,
        id: &str,
        source_url: Option<&str>,
        options: &ImageOptions,
    ) -> String {
        let config = self.config.snapshot();
        urls::image_url(
            config.base(),
            kind,
            provider,
            id,
            source_url.unwrap_or_default(),
            options,
            config.default_image_quality,
            config.primary_image_ratio,
        )
    }

    #[must_use]
    pub fn primary_image_url(&self, provider: &str, id: &str, options: &ImageOptions) -> String {
        self.image_url(ImageKind::Primary, provider, id, None, options)
    }

    #[must_use]
    pub fn primary_image_url_from(
        &self,
        provider: &str,
        id: &str,
        source_url: &str,
        options: &ImageOptions,
    ) -> String {
        self.image_url(ImageKind::Primary, provider, id, Some(source_url), options)
    }

    #[must_use]
    pub fn thumb_image_url(&self, provider: &str, id: &str, options: &ImageOptions) -> String {
        self.image_url(ImageKind::Thumb, provider, id, None, options)
    }

    #[must_use]
    pub fn thumb_image_url_from(
        &self,
        provider: &str,
        id: &str,
        source_url: &str,
        options: &ImageOptions,
    ) -> String {
        self.image_url(ImageKind::Thumb, provider, id, Some(source_url), options)
    }

    #[must_use]
    pub fn backdrop_image_url(&self, provider: &str, id: &str, options: &ImageOptions) -> String {
        self.image_url(ImageKind::Backdrop, provider, id, None, options)
    }

    #[must_use]
    pub fn backdrop_image_url_from(
        &self,
        provider: &str,
        id: &str,
        source_url: &str,
        options: &ImageOptions,
    ) -> String {
        self.image_url(ImageKind::Backdrop, provider, id, Some(source_url), options)
    }

    /// Send one GET and unwrap the envelope.
    ///
    /// The bearer token is attached only when `require_auth` is set and the
    /// configured token is not blank.
    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        config: &ServerConfig,
        require_auth: bool,
        cancel: &CancellationToken,
    ) -> Result<T, MetatubeError> {
        if cancel.is_cancelled() {
            return Err(MetatubeError::Cancelled);
        }

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if require_auth {
            if let Some(token) = config.bearer_token() {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
                value.set_sensitive(true);
                request = request.header(AUTHORIZATION, value);
            }
        }

        debug!(url = %url, require_auth, "MetaTube request");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = bytes_with_limit(response).await?;
            Ok::<_, MetatubeError>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(MetatubeError::Cancelled),
            result = exchange => result?,
        };

        trace!(url = %url, status = %status, bytes = body.len(), "MetaTube response");
        unwrap_envelope(status, url, &body)
    }
}

/// Map a status and body to the payload or the first matching failure.
///
/// The body is decoded regardless of status: the server reports structured
/// errors on failure responses too. On a failure status the `error` field is
/// decoded on its own first, so a `data` value of the wrong shape cannot hide
/// the remote error. Success statuses never consult `error`.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
    status: StatusCode,
    url: &str,
    body: &[u8],
) -> Result<T, MetatubeError> {
    let http_error = || MetatubeError::Http {
        status,
        url: url.to_string(),
    };

    if !status.is_success() {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error: Some(error) }) => {
                return Err(MetatubeError::Api {
                    code: error.code,
                    message: error.message,
                });
            }
            Ok(ErrorEnvelope { error: None }) => {}
            Err(_) => return Err(http_error()),
        }
    }

    let envelope: ApiResponse<T> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => return Err(http_error()),
        Err(err) => return Err(err.into()),
    };

    envelope.data.ok_or(MetatubeError::EmptyResponse)
}
