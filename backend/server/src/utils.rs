use std::{net::SocketAddr, sync::LazyLock};

use axum::http::HeaderMap;
use regex::Regex;

use crate::error::AppError::{self, Validation};

pub const MAX_MESSAGE_CHARS: usize = 20;
pub const UNKNOWN_ADDRESS: &str = "unknown";

static FINGERPRINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-z-]{1,64}$").unwrap());

/// Submitter address: first `X-Forwarded-For` hop, then `X-Real-IP`, then
/// the peer socket.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|peer| peer.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string())
}

/// Trimmed message, non-empty and at most [`MAX_MESSAGE_CHARS`] characters.
pub fn validate_message(message: &str) -> Result<String, AppError> {
    let trimmed = message.trim();

    if trimmed.is_empty() {
        return Err(Validation("Message is required"));
    }

    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(Validation("Message must be 20 characters or less"));
    }

    Ok(trimmed.to_string())
}

pub fn validate_fingerprint(fingerprint: &str) -> Result<(), AppError> {
    if FINGERPRINT.is_match(fingerprint) {
        Ok(())
    } else {
        Err(Validation("Invalid fingerprint"))
    }
}
