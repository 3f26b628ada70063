use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Claims the API relies on. `sub` is the identity-provider subject and becomes
/// the `userId` of posts and the `dealerId` of offers.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: String,
}

pub(crate) struct JwtService {
    secret: String,
    audience: Option<String>,
    issuer: Option<String>,
}

impl JwtService {
    pub(crate) fn new(secret: &str, audience: Option<String>, issuer: Option<String>) -> Self {
        JwtService {
            secret: secret.into(),
            audience,
            issuer,
        }
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;
        validation.set_required_spec_claims(&["exp", "sub"]);

        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}
