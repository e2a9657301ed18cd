// MetaTube API Client
//
// HTTP client for the MetaTube metadata server, used by media-server plugins
// (Jellyfin/Emby) for actor/movie lookups, search, image URLs and translation.
//
// Architecture:
// - urls: pure request URL composition
// - client: shared transport + the single fetch-and-unwrap routine
// - image: raw image passthrough
// - service: MetadataApi trait the host adapters depend on

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod urls;

mod client;
mod image;
mod service;

pub use client::{build_http_client, MetatubeClient};
pub use config::{ConfigSource, HttpConfig, LoggingConfig, ServerConfig, Settings, SharedConfig};
pub use error::MetatubeError;
pub use image::ImageResponse;
pub use service::MetadataApi;
pub use types::{ActorInfo, ActorSearchResult, MovieInfo, MovieSearchResult, TranslationInfo};
pub use urls::{ImageKind, ImageOptions};
