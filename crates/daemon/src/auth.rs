use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::{HeaderMap, Method};

use common::prelude::OwnerId;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthDenied {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,
}

/// Decides who a request acts as, or refuses it outright.
#[async_trait]
pub trait AuthGate: Send + Sync + 'static {
    async fn authorize(&self, method: &Method, headers: &HeaderMap) -> Result<OwnerId, AuthDenied>;
}

/// Single-owner gate guarded by an optional shared admin token.
///
/// Reads always pass. Writes must carry `Authorization: Bearer <token>` when
/// a token is configured. Every request resolves to the same owner.
#[derive(Debug, Clone)]
pub struct AdminTokenGate {
    owner: OwnerId,
    token: Option<String>,
}

impl AdminTokenGate {
    pub fn new(owner: OwnerId, token: Option<String>) -> Self {
        // an empty token in the environment means "no token"
        let token = token.filter(|t| !t.trim().is_empty());
        Self { owner, token }
    }

    fn is_read(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}

#[async_trait]
impl AuthGate for AdminTokenGate {
    async fn authorize(&self, method: &Method, headers: &HeaderMap) -> Result<OwnerId, AuthDenied> {
        let expected = match &self.token {
            Some(token) if !Self::is_read(method) => token,
            _ => return Ok(self.owner.clone()),
        };

        match bearer_token(headers) {
            None => Err(AuthDenied::MissingToken),
            Some(token) if token == expected => Ok(self.owner.clone()),
            Some(_) => Err(AuthDenied::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_reads_pass_without_token() {
        let gate = AdminTokenGate::new(OwnerId::default(), Some("secret".to_string()));
        let owner = gate
            .authorize(&Method::GET, &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(owner.as_str(), "admin");
        assert!(gate
            .authorize(&Method::OPTIONS, &HeaderMap::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_writes_need_matching_bearer() {
        let gate = AdminTokenGate::new(OwnerId::default(), Some("secret".to_string()));

        assert_eq!(
            gate.authorize(&Method::POST, &HeaderMap::new()).await,
            Err(AuthDenied::MissingToken)
        );
        assert_eq!(
            gate.authorize(&Method::DELETE, &headers_with("Bearer nope"))
                .await,
            Err(AuthDenied::InvalidToken)
        );
        assert_eq!(
            gate.authorize(&Method::PUT, &headers_with("Basic secret"))
                .await,
            Err(AuthDenied::MissingToken)
        );
        assert!(gate
            .authorize(&Method::POST, &headers_with("Bearer secret"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_no_token_configured_allows_writes() {
        let gate = AdminTokenGate::new(OwnerId::new("solo"), Some("  ".to_string()));
        let owner = gate
            .authorize(&Method::POST, &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(owner.as_str(), "solo");
    }
}
