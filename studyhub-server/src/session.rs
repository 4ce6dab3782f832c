//! Cookie-based session identity.
//!
//! Each browser session gets a UUID in the `studyhub_session` cookie, created
//! lazily on first access. The UUID doubles as the per-user identifier for
//! vector-store filtering.

use axum::http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "studyhub_session";

/// Session identity resolved for one request.
#[derive(Debug, Clone, Copy)]
pub struct SessionId {
    pub id: Uuid,
    /// True when the id was minted for this request (no valid cookie seen).
    pub is_new: bool,
}

/// Resolves the request's session: the cookie's UUID when present and valid,
/// a freshly minted one otherwise.
pub fn extract_session(headers: &HeaderMap) -> SessionId {
    let existing = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_session_cookie);

    match existing {
        Some(id) => SessionId { id, is_new: false },
        None => SessionId {
            id: Uuid::new_v4(),
            is_new: true,
        },
    }
}

fn parse_session_cookie(raw: &str) -> Option<Uuid> {
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name.trim() == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Wraps a handler response, setting the session cookie when it was just
/// minted so the browser carries it on subsequent requests.
pub fn with_session_cookie(session: SessionId, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if session.is_new {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, session.id
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
