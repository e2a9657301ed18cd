//! MetaTube HTTP API Types
//!
//! The `{data, error}` envelope shared by every JSON endpoint, and the payloads
//! it carries. Payloads keep the server's JSON object as is, explicit `null`s
//! and unknown fields included, and expose the published fields through
//! read-only accessors.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Generic MetaTube API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// The `error` half of the envelope, decoded without touching `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// Structured error reported by the server, present even on failure statuses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Servers report codes either as strings (`"not_found"`) or numbers (`404`).
fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Declares a payload type over the raw JSON object with one accessor per
/// published field. Accessors return `None` for a missing field, an explicit
/// `null`, or a value of another JSON type.
macro_rules! payload {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident: $kind:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Map<String, Value>);

        impl $name {
            $(payload!(@get $field $kind);)*

            /// Raw field lookup, for fields without an accessor.
            #[must_use]
            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            #[must_use]
            pub const fn as_map(&self) -> &Map<String, Value> {
                &self.0
            }

            #[must_use]
            pub fn into_map(self) -> Map<String, Value> {
                self.0
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(map: Map<String, Value>) -> Self {
                Self(map)
            }
        }
    };
    (@get $field:ident str) => {
        #[must_use]
        pub fn $field(&self) -> Option<&str> {
            self.0.get(stringify!($field)).and_then(Value::as_str)
        }
    };
    (@get $field:ident int) => {
        #[must_use]
        pub fn $field(&self) -> Option<i64> {
            self.0.get(stringify!($field)).and_then(Value::as_i64)
        }
    };
    (@get $field:ident float) => {
        #[must_use]
        pub fn $field(&self) -> Option<f64> {
            self.0.get(stringify!($field)).and_then(Value::as_f64)
        }
    };
    (@get $field:ident strs) => {
        #[must_use]
        pub fn $field(&self) -> Option<Vec<&str>> {
            self.0
                .get(stringify!($field))
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
        }
    };
}

payload! {
    ActorSearchResult {
        id: str,
        name: str,
        provider: str,
        homepage: str,
        aliases: strs,
        images: strs,
    }
}

payload! {
    /// Dates are kept as the server's strings.
    ActorInfo {
        id: str,
        name: str,
        provider: str,
        homepage: str,
        summary: str,
        hobby: str,
        skill: str,
        blood_type: str,
        cup_size: str,
        measurements: str,
        nationality: str,
        height: int,
        aliases: strs,
        images: strs,
        birthday: str,
        debut_date: str,
    }
}

payload! {
    MovieSearchResult {
        id: str,
        number: str,
        title: str,
        provider: str,
        homepage: str,
        thumb_url: str,
        cover_url: str,
        score: float,
        actors: strs,
        release_date: str,
    }
}

payload! {
    /// `runtime` is in minutes.
    MovieInfo {
        id: str,
        number: str,
        title: str,
        summary: str,
        provider: str,
        homepage: str,
        director: str,
        actors: strs,
        thumb_url: str,
        big_thumb_url: str,
        cover_url: str,
        big_cover_url: str,
        preview_video_url: str,
        preview_video_hls_url: str,
        preview_images: strs,
        maker: str,
        label: str,
        series: str,
        genres: strs,
        score: float,
        runtime: int,
        release_date: str,
    }
}

payload! {
    TranslationInfo {
        from: str,
        to: str,
        translated_text: str,
    }
}
