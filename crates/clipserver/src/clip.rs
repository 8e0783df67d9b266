//! Request validation and the small pure helpers the clip pipeline needs.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static TWEET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(x\.com|twitter\.com)/[a-zA-Z0-9_]+/status/\d+")
        .expect("tweet url pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tweetUrl is required and must be a string.")]
    MissingUrl,
    #[error("Invalid tweet URL.")]
    InvalidUrl,
    #[error("Start and end must be valid numbers, and end must be greater than start.")]
    InvalidRange,
    #[error("Request body must be a JSON object.")]
    MalformedBody,
}

/// A validated `POST /clip` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub tweet_url: String,
    pub start: f64,
    pub end: f64,
}

impl ClipRequest {
    /// Checks the raw body field by field so each failure gets its own message.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let tweet_url = match body.get("tweetUrl") {
            Some(Value::String(url)) if !url.is_empty() => url.clone(),
            _ => return Err(ValidationError::MissingUrl),
        };

        if !is_valid_tweet_url(&tweet_url) {
            return Err(ValidationError::InvalidUrl);
        }

        let seconds = |key: &str| {
            body.get(key)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v >= 0.0)
        };
        let (Some(start), Some(end)) = (seconds("start"), seconds("end")) else {
            return Err(ValidationError::InvalidRange);
        };
        if start >= end {
            return Err(ValidationError::InvalidRange);
        }

        Ok(Self { tweet_url, start, end })
    }

    /// The URL handed to the downloader.
    pub fn source_url(&self) -> String {
        normalize_url(&self.tweet_url)
    }

    /// Whole-second cut points, widened outward so the requested range is covered.
    pub fn span(&self) -> ClipSpan {
        ClipSpan {
            start: self.start.floor() as u64,
            end: self.end.ceil() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipSpan {
    pub start: u64,
    pub end: u64,
}

pub fn is_valid_tweet_url(url: &str) -> bool {
    TWEET_URL.is_match(url)
}

/// Rewrites the first `x.com` to `twitter.com`; yt-dlp handles the latter more reliably.
pub fn normalize_url(url: &str) -> String {
    url.replacen("x.com", "twitter.com", 1)
}

pub fn format_hhmmss(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
