//! Gateway tokens
//!
//! A token names the device a client authenticates as. It is an HS256 JWT
//! whose subject is the device id; the gateway never learns the user from the
//! token alone and has to look the device up.

use chrono::{Duration, Utc};
use derailed_core::Snowflake;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (device ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Get the device ID as a Snowflake
    pub fn device_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Encodes and decodes gateway tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: i64,
}

impl TokenService {
    /// Create a token service with the given secret and token lifetime (seconds)
    #[must_use]
    pub fn new(secret: &str, expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    /// Issue a token for a device
    pub fn issue(&self, device_id: Snowflake) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: device_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expiry)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode token: {e}")))
    }

    /// Decode and validate a token, returning its claims
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Resolve a token to the device it was issued for
    ///
    /// A leading `Bearer ` is tolerated.
    pub fn device_id(&self, token: &str) -> Result<Snowflake, AppError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        self.decode(token)?.device_id()
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
