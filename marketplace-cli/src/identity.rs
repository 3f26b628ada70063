use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use marketplace_client::profile::{IdentityError, IdentitySession, IdentityUser, TokenRequest};

use crate::parse_token_content;

/// Сессия identity-провайдера для терминала.
///
/// Без взаимодействия токен берётся из переменной окружения или файла,
/// интерактивно запрашивается вводом в stdin.
pub(crate) struct CliIdentitySession {
    user: IdentityUser,
    env_token: Option<String>,
    token_file: PathBuf,
}

impl CliIdentitySession {
    pub(crate) fn new(user: IdentityUser, env_token: Option<String>, token_file: PathBuf) -> Self {
        Self {
            user,
            env_token,
            token_file,
        }
    }

    fn cached_token(&self) -> Result<Option<String>, IdentityError> {
        if let Some(token) = self.env_token.as_deref().and_then(parse_token_content) {
            tracing::debug!("identity token taken from IDENTITY_ACCESS_TOKEN");
            return Ok(Some(token));
        }
        if !self.token_file.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.token_file)
            .map_err(|err| IdentityError::Provider(err.to_string()))?;
        tracing::debug!(path = %self.token_file.display(), "identity token read from file");
        Ok(parse_token_content(&raw))
    }
}

#[async_trait]
impl IdentitySession for CliIdentitySession {
    fn user(&self) -> Option<IdentityUser> {
        Some(self.user.clone())
    }

    async fn token_silently(&self, _request: &TokenRequest) -> Result<String, IdentityError> {
        self.cached_token()?.ok_or_else(|| {
            IdentityError::InteractionRequired(format!(
                "no cached token in IDENTITY_ACCESS_TOKEN or {}",
                self.token_file.display()
            ))
        })
    }

    async fn token_with_popup(&self, request: &TokenRequest) -> Result<String, IdentityError> {
        let prompt = format!(
            "Вставьте access token (audience={}, scope={}): ",
            request.audience, request.scope
        );

        let line = tokio::task::spawn_blocking(move || read_line(&prompt))
            .await
            .map_err(|err| IdentityError::Provider(err.to_string()))?
            .map_err(|err| IdentityError::Provider(err.to_string()))?;

        parse_token_content(&line).ok_or(IdentityError::Cancelled)
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(prompt.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> IdentityUser {
        IdentityUser {
            sub: "auth0|abc".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn silent_token_prefers_environment() {
        let session = CliIdentitySession::new(
            user(),
            Some("  env.token  ".to_string()),
            PathBuf::from("does-not-exist.identity_token"),
        );

        let token = session
            .token_silently(&TokenRequest::management_api("tenant.auth0.com"))
            .await
            .expect("env token must be used");
        assert_eq!(token, "env.token");
    }

    #[tokio::test]
    async fn silent_token_without_cache_requires_interaction() {
        let session = CliIdentitySession::new(
            user(),
            Some("   ".to_string()),
            PathBuf::from("does-not-exist.identity_token"),
        );

        let err = session
            .token_silently(&TokenRequest::management_api("tenant.auth0.com"))
            .await
            .expect_err("nothing cached");
        assert!(matches!(err, IdentityError::InteractionRequired(_)));
    }
}
