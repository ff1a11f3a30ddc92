use actix_web::HttpRequest;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while establishing the caller's identity
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// The authenticated identity carried by a verified token. The `user_id`
/// is the foreign key for profiles, listings and seeker documents.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    exp: usize,
}

/// Verifies bearer tokens issued by the auth collaborator.
///
/// Identity is derived per request; there is no server-side session. A
/// missing or invalid token on a protected route surfaces as a 401 telling
/// the user to authenticate, never as a crash.
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Extract and verify the identity from an `Authorization: Bearer`
    /// header.
    pub fn identify(&self, req: &HttpRequest) -> Result<Identity, AuthError> {
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        Ok(Identity {
            user_id: data.claims.sub,
            name: data.claims.name,
            email: data.claims.email,
            photo_url: data.claims.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(secret: &str, sub: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            name: "Test User".to_string(),
            email: Some("test@example.com".to_string()),
            picture: None,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = IdentityVerifier::new("secret");
        let identity = verifier.verify(&token_for("secret", "user_1")).unwrap();
        assert_eq!(identity.user_id, "user_1");
        assert_eq!(identity.name, "Test User");
    }

    #[test]
    fn rejects_token_with_wrong_secret() {
        let verifier = IdentityVerifier::new("secret");
        let result = verifier.verify(&token_for("other", "user_1"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
