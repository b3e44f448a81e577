//! Signed bearer tokens carrying a user identifier.
//!
//! Tokens are HS256 JWTs with `{sub, iat, exp}` claims. Expiry is checked
//! against an injected [`Clock`] rather than the library's wall clock so
//! tests can move time forward deterministically.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::UserId;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Reasons a bearer token is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature or algorithm did not match the configured secret.
    #[error("token signature is invalid")]
    InvalidToken,
    /// The current time is at or past `exp`.
    #[error("token has expired")]
    Expired,
    /// The token could not be decoded or its subject is not a user id.
    #[error("token is malformed")]
    Malformed,
}

/// Failure while minting a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to sign token: {message}")]
pub struct TokenIssueError {
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies bearer tokens.
///
/// The signing secret is fixed at construction; rotating it means building
/// a new service, which invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Build a service signing with `secret` and stamping tokens valid for
    /// `ttl`. Durations beyond chrono's range saturate.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let secret = Zeroizing::new(secret.to_vec());
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Mint a token for `user_id` valid from now until now + ttl.
    pub fn issue(&self, user_id: &UserId) -> Result<String, TokenIssueError> {
        let now = self.clock.utc();
        let expires = now.checked_add_signed(self.ttl).unwrap_or(now);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            TokenIssueError {
                message: err.to_string(),
            }
        })
    }

    /// Verify `token` and return the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidToken
                }
                _ => TokenError::Malformed,
            }
        })?;

        if self.clock.utc().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        UserId::new(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"test-signing-secret";

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid fixture instant");
        Arc::new(MutableClock::new(start))
    }

    fn service(secret: &[u8], clock: &Arc<MutableClock>) -> TokenService {
        TokenService::new(secret, DEFAULT_TOKEN_TTL, clock.clone())
    }

    #[rstest]
    fn round_trips_within_ttl(clock: Arc<MutableClock>) {
        let tokens = service(SECRET, &clock);
        let user = UserId::random();
        let token = tokens.issue(&user).expect("token issued");

        clock.advance_seconds(24 * 60 * 60 - 1);
        assert_eq!(tokens.verify(&token), Ok(user));
    }

    #[rstest]
    fn expires_exactly_at_ttl(clock: Arc<MutableClock>) {
        let tokens = service(SECRET, &clock);
        let token = tokens.issue(&UserId::random()).expect("token issued");

        clock.advance_seconds(24 * 60 * 60);
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn rejects_tokens_from_another_secret(clock: Arc<MutableClock>) {
        let token = service(b"other-secret", &clock)
            .issue(&UserId::random())
            .expect("token issued");
        assert_eq!(service(SECRET, &clock).verify(&token), Err(TokenError::InvalidToken));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn rejects_garbage_as_malformed(clock: Arc<MutableClock>, #[case] raw: &str) {
        assert_eq!(service(SECRET, &clock).verify(raw), Err(TokenError::Malformed));
    }

    #[rstest]
    fn rejects_non_uuid_subjects(clock: Arc<MutableClock>) {
        let now = clock.utc().timestamp();
        let claims = Claims {
            sub: "507f1f77bcf86cd799439011".to_owned(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("token encodes");
        assert_eq!(service(SECRET, &clock).verify(&token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn configurable_ttl_is_honoured(clock: Arc<MutableClock>) {
        let tokens = TokenService::new(SECRET, Duration::from_secs(60), clock.clone());
        let token = tokens.issue(&UserId::random()).expect("token issued");
        clock.advance_seconds(59);
        assert!(tokens.verify(&token).is_ok());
        clock.advance_seconds(1);
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }
}
