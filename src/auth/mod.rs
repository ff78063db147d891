pub mod password;
pub mod token;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use password::{PasswordError, PasswordHasher};
pub use token::{TokenError, TokenService};

/// Subject carried by every access token this service issues.
pub const ACCESS_TOKEN_SUBJECT: &str = "access-token";

/// Signed payload of an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    pub user_id: i64,
    pub username: String,
    pub dob: Option<NaiveDate>,
}

/// The user facts a token is issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub dob: Option<NaiveDate>,
}
