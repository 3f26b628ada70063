use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use super::error::{IdentityError, ProfileError};

/// Scope, необходимый для изменения `user_metadata` текущего пользователя.
pub const MANAGEMENT_API_SCOPE: &str = "update:current_user_metadata";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Параметры запроса токена у identity-провайдера.
pub struct TokenRequest {
    /// Аудитория токена.
    pub audience: String,
    /// Запрашиваемый scope.
    pub scope: String,
}

impl TokenRequest {
    /// Запрос токена Management API для домена вида `tenant.auth0.com`.
    pub fn management_api(domain: &str) -> Self {
        Self {
            audience: format!("https://{}/api/v2/", domain.trim_end_matches('/')),
            scope: MANAGEMENT_API_SCOPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Аутентифицированный пользователь и его текущие метаданные.
pub struct IdentityUser {
    /// Субъект (`sub`) пользователя.
    pub sub: String,
    /// Email, только для чтения.
    pub email: Option<String>,
    /// Роль (покупатель или дилер), только для чтения.
    pub role: Option<String>,
    /// Текущее имя пользователя из метаданных.
    pub user_name: Option<String>,
    /// Текущий телефон из метаданных.
    pub phone_number: Option<String>,
}

/// Сессия identity-провайдера: текущий пользователь и выдача токенов.
#[async_trait]
pub trait IdentitySession: Send + Sync {
    /// Текущий пользователь или `None`, если вход не выполнен.
    fn user(&self) -> Option<IdentityUser>;

    /// Получает токен без участия пользователя.
    async fn token_silently(&self, request: &TokenRequest) -> Result<String, IdentityError>;

    /// Получает токен интерактивно (всплывающее окно, ввод и т.п.).
    async fn token_with_popup(&self, request: &TokenRequest) -> Result<String, IdentityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Редактируемые поля `user_metadata`.
pub struct UserMetadata {
    /// Имя пользователя.
    pub user_name: String,
    /// Номер телефона.
    pub phone_number: String,
}

/// API, сохраняющий метаданные пользователя у identity-провайдера.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Отправляет один запрос на обновление метаданных пользователя `sub`.
    async fn update_user_metadata(
        &self,
        sub: &str,
        access_token: &str,
        metadata: &UserMetadata,
    ) -> Result<(), ProfileError>;
}

#[derive(Serialize)]
struct MetadataPatch<'a> {
    user_metadata: &'a UserMetadata,
}

#[derive(Debug, Clone)]
/// Клиент Management API на `reqwest`: `PATCH {users_url}/{sub}`.
pub struct ManagementApiClient {
    users_url: Url,
    client: Client,
}

impl ManagementApiClient {
    /// Клиент для `https://{domain}/api/v2/users`.
    pub fn new(domain: &str) -> Result<Self, ProfileError> {
        let raw = format!("https://{}/api/v2/users", domain.trim_end_matches('/'));
        let users_url =
            Url::parse(&raw).map_err(|_| ProfileError::InvalidDomain(domain.to_string()))?;
        Self::with_users_url(users_url)
    }

    /// Клиент с явным адресом коллекции пользователей.
    pub fn with_users_url(users_url: Url) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self { users_url, client })
    }

    fn user_url(&self, sub: &str) -> Result<Url, ProfileError> {
        let mut url = self.users_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProfileError::InvalidDomain(self.users_url.to_string()))?
            .pop_if_empty()
            .push(sub);
        Ok(url)
    }
}

#[async_trait]
impl MetadataApi for ManagementApiClient {
    async fn update_user_metadata(
        &self,
        sub: &str,
        access_token: &str,
        metadata: &UserMetadata,
    ) -> Result<(), ProfileError> {
        let response = self
            .client
            .patch(self.user_url(sub)?)
            .bearer_auth(access_token)
            .json(&MetadataPatch {
                user_metadata: metadata,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
