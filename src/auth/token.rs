use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use super::{AccessClaims, Identity, ACCESS_TOKEN_SUBJECT};
use crate::config::SecurityConfig;

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token signature is invalid")]
    InvalidSignature,
}

/// Out-of-range values saturate so that `issue` reports `Signing` instead of
/// minting tokens that are already expired.
fn ttl_from_hours(hours: u64) -> Duration {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX)
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and validates HS256 access tokens.
///
/// Tokens are stateless: there is no refresh flow and no revocation list, so a
/// leaked token stays usable until its `exp`.
pub struct TokenService {
    keys: Option<Keys>,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    /// An empty secret leaves the service without keys: issuing fails with
    /// `Signing` and every token is rejected.
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>, ttl: Duration) -> Self {
        let keys = (!secret.is_empty()).then(|| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            &security.jwt_secret,
            security.jwt_issuer.clone(),
            security.jwt_audience.clone(),
            ttl_from_hours(security.jwt_expiry_hours),
        )
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| TokenError::Signing("signing key is not configured".to_string()))?;

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime is out of range".to_string()))?;
        let issued_at = now.timestamp();
        let claims = AccessClaims {
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: ACCESS_TOKEN_SUBJECT.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at,
            nbf: issued_at,
            user_id: identity.user_id,
            username: identity.username.clone(),
            dob: identity.dob,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a bearer token and return its claims.
    ///
    /// The validity window is checked before the signature, so an expired token
    /// reports `Expired` whoever signed it.
    pub fn validate(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims = read_unverified(token)?;

        let now = Utc::now().timestamp();
        if claims.exp < now {
            return Err(TokenError::Expired);
        }
        if claims.nbf > now {
            return Err(TokenError::NotYetValid);
        }

        let keys = self.keys.as_ref().ok_or(TokenError::InvalidSignature)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Window already checked against a single `now` above
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.sub = Some(ACCESS_TOKEN_SUBJECT.to_string());
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "aud", "sub"]);

        decode::<AccessClaims>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                ErrorKind::InvalidIssuer => TokenError::Malformed("unexpected issuer".to_string()),
                ErrorKind::InvalidAudience => TokenError::Malformed("unexpected audience".to_string()),
                ErrorKind::InvalidSubject => TokenError::Malformed("unexpected subject".to_string()),
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

/// Parse the claim set without verifying the signature.
fn read_unverified(token: &str) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "nbf", "iat"]);

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SECRET: &str = "test-secret";

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, "mygram-api", "mygram-clients", Duration::hours(1))
    }

    fn identity() -> Identity {
        Identity {
            user_id: 42,
            username: "alice".to_string(),
            dob: NaiveDate::from_ymd_opt(1995, 4, 12),
        }
    }

    #[test]
    fn issue_then_validate_round_trips_identity() {
        let svc = service(SECRET);
        let token = svc.issue(&identity()).unwrap();
        let claims = svc.validate(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.dob, NaiveDate::from_ymd_opt(1995, 4, 12));
        assert_eq!(claims.sub, ACCESS_TOKEN_SUBJECT);
        assert_eq!(claims.iss, "mygram-api");
        assert_eq!(claims.aud, "mygram-clients");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn round_trips_missing_dob() {
        let svc = service(SECRET);
        let mut who = identity();
        who.dob = None;
        let claims = svc.validate(&svc.issue(&who).unwrap()).unwrap();
        assert_eq!(claims.dob, None);
    }

    #[test]
    fn every_token_gets_a_unique_id() {
        let svc = service(SECRET);
        let a = svc.validate(&svc.issue(&identity()).unwrap()).unwrap();
        let b = svc.validate(&svc.issue(&identity()).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service(SECRET);
        let token = svc.issue_at(&identity(), Utc::now() - Duration::hours(2)).unwrap();
        assert_eq!(svc.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn expired_token_reports_expired_even_with_foreign_signature() {
        let foreign = service("some-other-secret");
        let token = foreign.issue_at(&identity(), Utc::now() - Duration::hours(2)).unwrap();
        assert_eq!(service(SECRET).validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let foreign = service("some-other-secret");
        let token = foreign.issue(&identity()).unwrap();
        assert_eq!(service(SECRET).validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = service(SECRET);
        let token = svc.issue(&identity()).unwrap();
        let other = svc
            .issue(&Identity {
                user_id: 7,
                username: "mallory".to_string(),
                dob: None,
            })
            .unwrap();

        // Splice the second token's payload onto the first token's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(svc.validate(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn token_from_the_future_is_not_yet_valid() {
        let svc = service(SECRET);
        let token = svc.issue_at(&identity(), Utc::now() + Duration::minutes(30)).unwrap();
        assert_eq!(svc.validate(&token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service(SECRET);
        assert!(matches!(svc.validate("not-a-token"), Err(TokenError::Malformed(_))));
        assert!(matches!(svc.validate("a.b.c"), Err(TokenError::Malformed(_))));
        assert!(matches!(svc.validate(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let other_audience = TokenService::new(SECRET, "mygram-api", "someone-else", Duration::hours(1));
        let token = other_audience.issue(&identity()).unwrap();
        assert!(matches!(service(SECRET).validate(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn missing_secret_cannot_sign_or_validate() {
        let unkeyed = service("");
        assert!(matches!(unkeyed.issue(&identity()), Err(TokenError::Signing(_))));

        let token = service(SECRET).issue(&identity()).unwrap();
        assert_eq!(unkeyed.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn oversized_lifetime_fails_to_sign() {
        for hours in [3_000_000_000, u64::MAX] {
            let svc = TokenService::new(SECRET, "mygram-api", "mygram-clients", ttl_from_hours(hours));
            assert!(matches!(svc.issue(&identity()), Err(TokenError::Signing(_))));
        }
    }

    #[test]
    fn lifetime_comes_from_config_hours() {
        let svc = TokenService::new(SECRET, "mygram-api", "mygram-clients", ttl_from_hours(24));
        let claims = svc.validate(&svc.issue(&identity()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }
}
