use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::WebError;

pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

#[derive(Clone)]
pub struct ApiKeys {
    keys: HashSet<String>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self { keys }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Bearer API-key check for the protected (catalog admin) routes.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(request.headers()).ok_or(WebError::Unauthorized)?;

    if !api_keys.is_valid(token) {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The acting customer, taken from the `X-Customer-Id` header the
/// session gateway injects. Customer-scoped handlers extract this to
/// enforce ownership.
pub struct CustomerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CustomerId
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CUSTOMER_ID_HEADER)
            .ok_or(WebError::Unauthorized)?
            .to_str()
            .map_err(|_| WebError::Unauthorized)?;

        let customer_id = Uuid::parse_str(value).map_err(|_| {
            WebError::BadRequest("X-Customer-Id must be a valid UUID".to_string())
        })?;

        Ok(CustomerId(customer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_parsed_and_trimmed() {
        let keys = ApiKeys::from_comma_separated(" alpha , beta,,gamma ");
        assert!(keys.is_valid("alpha"));
        assert!(keys.is_valid("beta"));
        assert!(keys.is_valid("gamma"));
        assert!(!keys.is_valid(""));
        assert!(!keys.is_valid("delta"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer secret".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("secret"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic secret".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
