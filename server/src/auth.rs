//! Session lookup for incoming requests.
//!
//! Sessions are issued by the external auth provider as HS256 JWTs whose
//! `sub` claim is the user id. A missing, malformed or expired token simply
//! means the request is anonymous; services decide whether that is enough.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::models::Viewer;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub struct SessionVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Provider tokens carry an audience we do not pin.
        validation.validate_aud = false;
        Self {
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Option<Viewer> {
        let data = match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                return None;
            }
        };
        Uuid::parse_str(&data.claims.sub).ok().map(Viewer::new)
    }

    pub fn current_user(&self, headers: &HeaderMap) -> Option<Viewer> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .trim();
        if token.is_empty() {
            return None;
        }
        self.verify(token)
    }
}

/// The viewer behind a request, if any.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<Viewer>);

impl CurrentUser {
    pub fn viewer(&self) -> Option<&Viewer> {
        self.0.as_ref()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(state.sessions.current_user(&parts.headers)))
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::Claims;

    pub const SECRET: &[u8] = b"test-secret";

    pub fn token_for(sub: &str, secret: &[u8]) -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }
}
