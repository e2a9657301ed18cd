//! Request URL composition
//!
//! Pure string building: no I/O, no validation. Every declared query key is
//! always emitted, sentinel values included, so the server sees the same
//! parameter set on every call and applies its own defaults.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

use crate::config::UNSET;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Image endpoint family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Primary,
    Thumb,
    Backdrop,
}

impl ImageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Thumb => "thumb",
            Self::Backdrop => "backdrop",
        }
    }
}

/// Optional image transform parameters.
///
/// `ratio: None` means "use the kind's default": the configured primary ratio
/// for primary images, unset for thumb and backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub ratio: Option<f64>,
    pub position: f64,
    pub auto: bool,
    pub badge: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            ratio: None,
            position: UNSET,
            auto: false,
            badge: String::new(),
        }
    }
}

impl ImageOptions {
    #[must_use]
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    #[must_use]
    pub fn position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    #[must_use]
    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }
}

/// Shortest decimal form that parses back to the same `f64` (`-1`, `1.78`).
#[must_use]
pub fn format_number(value: f64) -> String {
    value.to_string()
}

const fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn compose(base: &str, segments: &[&str], query: &[(&str, &str)]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        // RFC 3986 normalisation keeps `%2E` segments; WHATWG parsers such as
        // `url` still fold them, so a bare `.` or `..` id cannot be addressed.
        match *segment {
            "." => url.push_str("%2E"),
            ".." => url.push_str("%2E%2E"),
            _ => url.extend(utf8_percent_encode(segment, PATH_SEGMENT)),
        }
    }

    if !query.is_empty() {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in query {
            serializer.append_pair(key, value);
        }
        url.push('?');
        url.push_str(&serializer.finish());
    }

    url
}

/// `/v1/actors/{provider}/{id}?lazy=`
#[must_use]
pub fn actor_info_url(base: &str, provider: &str, id: &str, lazy: bool) -> String {
    compose(
        base,
        &["v1", "actors", provider, id],
        &[("lazy", format_bool(lazy))],
    )
}

/// `/v1/movies/{provider}/{id}?lazy=`
#[must_use]
pub fn movie_info_url(base: &str, provider: &str, id: &str, lazy: bool) -> String {
    compose(
        base,
        &["v1", "movies", provider, id],
        &[("lazy", format_bool(lazy))],
    )
}

/// `/v1/actors/search?q=&provider=&fallback=`
#[must_use]
pub fn search_actor_url(base: &str, q: &str, provider: &str, fallback: bool) -> String {
    compose(
        base,
        &["v1", "actors", "search"],
        &[("q", q), ("provider", provider), ("fallback", format_bool(fallback))],
    )
}

/// `/v1/movies/search?q=&provider=&fallback=`
#[must_use]
pub fn search_movie_url(base: &str, q: &str, provider: &str, fallback: bool) -> String {
    compose(
        base,
        &["v1", "movies", "search"],
        &[("q", q), ("provider", provider), ("fallback", format_bool(fallback))],
    )
}

/// `/v1/translate?q=&from=&to=&engine=` followed by engine-specific pairs.
#[must_use]
pub fn translate_url(
    base: &str,
    q: &str,
    from: &str,
    to: &str,
    engine: &str,
    extra: &[(&str, &str)],
) -> String {
    let mut query = vec![("q", q), ("from", from), ("to", to), ("engine", engine)];
    query.extend_from_slice(extra);
    compose(base, &["v1", "translate"], &query)
}

/// `/v1/images/{kind}/{provider}/{id}?url=&ratio=&pos=&auto=&badge=&quality=`
///
/// `source_url` is empty when the server should use the image it already
/// knows for this item.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn image_url(
    base: &str,
    kind: ImageKind,
    provider: &str,
    id: &str,
    source_url: &str,
    options: &ImageOptions,
    quality: i32,
    primary_ratio: f64,
) -> String {
    let ratio = options.ratio.unwrap_or(match kind {
        ImageKind::Primary => primary_ratio,
        ImageKind::Thumb | ImageKind::Backdrop => UNSET,
    });
    let ratio = format_number(ratio);
    let position = format_number(options.position);
    let quality = quality.to_string();

    compose(
        base,
        &["v1", "images", kind.as_str(), provider, id],
        &[
            ("url", source_url),
            ("ratio", &ratio),
            ("pos", &position),
            ("auto", format_bool(options.auto)),
            ("badge", &options.badge),
            ("quality", &quality),
        ],
    )
}
