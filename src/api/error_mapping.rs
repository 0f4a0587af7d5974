//! Error mapping helpers for the HTTP gateway.

use reqwest::StatusCode;

use super::error::WorkspaceError;

const MAX_BODY_CHARS: usize = 160;

/// Maps a reqwest failure raised while sending or reading a response.
pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> WorkspaceError {
    if error.is_decode() {
        return WorkspaceError::Api {
            message: format!("{operation} returned an unreadable body: {error}"),
        };
    }

    WorkspaceError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success HTTP status and its body into an API error.
pub(super) fn map_status_error(operation: &str, status: StatusCode, body: &str) -> WorkspaceError {
    let detail = if body.trim().is_empty() {
        "(empty response body)".to_owned()
    } else {
        truncate_for_message(body.trim(), MAX_BODY_CHARS)
    };

    WorkspaceError::Api {
        message: format!(
            "{operation} failed with status {}: {detail}",
            status.as_u16()
        ),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}
