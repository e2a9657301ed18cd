//! MetaTube service interface
//!
//! Host adapters (Jellyfin/Emby provider glue, the CLI) depend on this trait
//! rather than on the concrete client.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::MetatubeClient;
use crate::error::MetatubeError;
use crate::image::ImageResponse;
use crate::types::{ActorInfo, ActorSearchResult, MovieInfo, MovieSearchResult, TranslationInfo};
use crate::urls::{ImageKind, ImageOptions};

/// Unified MetaTube interface
#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn get_actor_info(
        &self,
        provider: &str,
        id: &str,
        lazy: bool,
        cancel: &CancellationToken,
    ) -> Result<ActorInfo, MetatubeError>;

    async fn get_movie_info(
        &self,
        provider: &str,
        id: &str,
        lazy: bool,
        cancel: &CancellationToken,
    ) -> Result<MovieInfo, MetatubeError>;

    async fn search_actor(
        &self,
        q: &str,
        provider: &str,
        fallback: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActorSearchResult>, MetatubeError>;

    async fn search_movie(
        &self,
        q: &str,
        provider: &str,
        fallback: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSearchResult>, MetatubeError>;

    async fn translate(
        &self,
        q: &str,
        from: &str,
        to: &str,
        engine: &str,
        extra: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<TranslationInfo, MetatubeError>;

    async fn get_image_response(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageResponse, MetatubeError>;

    fn image_url(
        &self,
        kind: ImageKind,
        provider: &str,
        id: &str,
        source_url: Option<&str>,
        options: &ImageOptions,
    ) -> String;
}

#[async_trait]
impl MetadataApi for MetatubeClient {
    async fn get_actor_info(
        &self,
        provider: &str,
        id: &str,
        lazy: bool,
        cancel: &CancellationToken,
    ) -> Result<ActorInfo, MetatubeError> {
        Self::get_actor_info(self, provider, id, lazy, cancel).await
    }

    async fn get_movie_info(
        &self,
        provider: &str,
        id: &str,
        lazy: bool,
        cancel: &CancellationToken,
    ) -> Result<MovieInfo, MetatubeError> {
        Self::get_movie_info(self, provider, id, lazy, cancel).await
    }

    async fn search_actor(
        &self,
        q: &str,
        provider: &str,
        fallback: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActorSearchResult>, MetatubeError> {
        Self::search_actor(self, q, provider, fallback, cancel).await
    }

    async fn search_movie(
        &self,
        q: &str,
        provider: &str,
        fallback: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSearchResult>, MetatubeError> {
        Self::search_movie(self, q, provider, fallback, cancel).await
    }

    async fn translate(
        &self,
        q: &str,
        from: &str,
        to: &str,
        engine: &str,
        extra: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<TranslationInfo, MetatubeError> {
        Self::translate(self, q, from, to, engine, extra, cancel).await
    }

    async fn get_image_response(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageResponse, MetatubeError> {
        Self::get_image_response(self, url, cancel).await
    }

    fn image_url(
        &self,
        kind: ImageKind,
        provider: &str,
        id: &str,
        source_url: Option<&str>,
        options: &ImageOptions,
    ) -> String {
        Self::image_url(self, kind, provider, id, source_url, options)
    }
}
