//! Raw image passthrough
//!
//! Fetches image bytes for hosts that proxy images instead of handing out
//! URLs. No JSON decoding and no auth header; the response is returned
//! whatever its status, for the host adapter to translate.

use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    StatusCode,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::MetatubeClient;
use crate::error::{MetatubeError, MAX_RESPONSE_SIZE};

/// Neutral description of an upstream image response.
///
/// Dropping the body stream aborts the transfer.
pub struct ImageResponse {
    pub status: StatusCode,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    body: BoxStream<'static, Result<Bytes, MetatubeError>>,
}

impl std::fmt::Debug for ImageResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl ImageResponse {
    fn from_response(response: reqwest::Response) -> Self {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            status: response.status(),
            content_length: response.content_length(),
            content_type,
            headers: response.headers().clone(),
            body: response.bytes_stream().map_err(MetatubeError::from).boxed(),
        }
    }

    /// Whether the upstream answered with a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as a byte stream, for streaming to the host's own response.
    pub fn into_stream(self) -> BoxStream<'static, Result<Bytes, MetatubeError>> {
        self.body
    }

    /// Collect the whole body, bounded by [`MAX_RESPONSE_SIZE`].
    pub async fn bytes(self) -> Result<Bytes, MetatubeError> {
        if let Some(cl) = self.content_length {
            if cl > MAX_RESPONSE_SIZE as u64 {
                return Err(MetatubeError::ResponseTooLarge { size: cl });
            }
        }

        let mut body = self.body;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            if buf.len() + chunk.len() > MAX_RESPONSE_SIZE {
                return Err(MetatubeError::ResponseTooLarge {
                    size: (buf.len() + chunk.len()) as u64,
                });
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl MetatubeClient {
    /// Fetch an image by absolute URL and hand back the raw response.
    ///
    /// Usually the URL comes from one of the image URL builders.
    pub async fn get_image_response(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageResponse, MetatubeError> {
        if cancel.is_cancelled() {
            return Err(MetatubeError::Cancelled);
        }

        debug!(url = %url, "MetaTube image request");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(MetatubeError::Cancelled),
            result = self.http().get(url).send() => result?,
        };

        Ok(ImageResponse::from_response(response))
    }
}
