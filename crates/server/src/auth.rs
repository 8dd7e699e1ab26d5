// ABOUTME: HTTP Basic authentication for the extraction endpoint.
// ABOUTME: Decodes the Authorization header and compares both fields without early exit.

use std::fmt;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// The single username/password pair accepted by the server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a username/password pair. Both fields are always compared.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }

    /// Check a raw `Authorization` header value.
    pub fn verify_header(&self, header: &str) -> bool {
        parse_basic(header).is_some_and(|(user, pass)| self.verify(&user, &pass))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Decode `Basic <base64(user:pass)>` into its two fields.
pub fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = a.len() ^ b.len();
    for (i, x) in a.iter().enumerate() {
        diff |= usize::from(x ^ b.get(i).copied().unwrap_or(0));
    }
    diff == 0
}

/// Middleware rejecting requests without valid Basic credentials.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|header| state.credentials.verify_header(header));

    if !authorized {
        warn!(path = %request.uri().path(), "authentication failed");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    #[test]
    fn parses_basic_header() {
        assert_eq!(
            parse_basic(&basic("admin:pa:ss")),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(
            parse_basic(&format!("basic {}", STANDARD.encode("a:b"))),
            Some(("a".to_string(), "b".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
        assert_eq!(parse_basic(&basic("no-colon")), None);
        assert_eq!(parse_basic(""), None);
    }

    #[test]
    fn verifies_both_fields() {
        let creds = Credentials::new("admin", "password");
        assert!(creds.verify_header(&basic("admin:password")));
        assert!(!creds.verify_header(&basic("admin:passwor")));
        assert!(!creds.verify_header(&basic("root:password")));
        assert!(!creds.verify_header(&basic(":")));
    }

    #[test]
    fn debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("admin"));
        assert!(!shown.contains("hunter2"));
    }
}
