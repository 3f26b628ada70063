//! Клиентская библиотека для работы с marketplace-server по HTTP.
//!
//! Предоставляет:
//! - `MarketplaceClient`: типизированный клиент REST API постов и офферов;
//! - модуль [`profile`]: редактор профиля пользователя у identity-провайдера.
//!
//! Клиент хранит JWT-токен identity-провайдера и автоматически использует
//! его в защищённых операциях.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;
pub mod profile;

pub use error::{MarketplaceClientError, MarketplaceClientResult};
pub use models::{
    ListOffersResponse, ListPostsResponse, Offer, OfferInput, OfferStatus, Post, PostInput,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент REST API маркетплейса автомобилей.
pub struct MarketplaceClient {
    http_client: HttpClient,
    token: Option<String>,
}

impl MarketplaceClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> MarketplaceClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn require_token(&self) -> MarketplaceClientResult<&str> {
        self.token
            .as_deref()
            .ok_or(MarketplaceClientError::Unauthorized)
    }

    /// Создаёт новый пост.
    ///
    /// Требует установленный JWT-токен.
    pub async fn create_post(&self, input: &PostInput) -> MarketplaceClientResult<Post> {
        let token = self.require_token()?;
        self.http_client.create_post(token, input).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> MarketplaceClientResult<Post> {
        self.http_client.get_post(id).await
    }

    /// Обновляет пост; доступно только его владельцу.
    pub async fn update_post(&self, id: i64, input: &PostInput) -> MarketplaceClientResult<Post> {
        let token = self.require_token()?;
        self.http_client.update_post(token, id, input).await
    }

    /// Удаляет пост; доступно только его владельцу.
    pub async fn delete_post(&self, id: i64) -> MarketplaceClientResult<()> {
        let token = self.require_token()?;
        self.http_client.delete_post(token, id).await
    }

    /// Возвращает список постов, при необходимости только одного пользователя.
    pub async fn list_posts(
        &self,
        user_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> MarketplaceClientResult<ListPostsResponse> {
        self.http_client.list_posts(user_id, limit, offset).await
    }

    /// Создаёт оффер от имени текущего дилера.
    pub async fn create_offer(&self, input: &OfferInput) -> MarketplaceClientResult<Offer> {
        let token = self.require_token()?;
        self.http_client.create_offer(token, input).await
    }

    /// Получает оффер по идентификатору.
    pub async fn get_offer(&self, id: i64) -> MarketplaceClientResult<Offer> {
        self.http_client.get_offer(id).await
    }

    /// Перезаписывает статус оффера любым из четырёх значений.
    pub async fn update_offer_status(
        &self,
        id: i64,
        status: OfferStatus,
    ) -> MarketplaceClientResult<Offer> {
        let token = self.require_token()?;
        self.http_client.update_offer_status(token, id, status).await
    }

    /// Удаляет оффер; доступно только дилеру, который его создал.
    pub async fn delete_offer(&self, id: i64) -> MarketplaceClientResult<()> {
        let token = self.require_token()?;
        self.http_client.delete_offer(token, id).await
    }

    /// Возвращает офферы с фильтрами по посту и дилеру.
    pub async fn list_offers(
        &self,
        post_id: Option<i64>,
        dealer_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> MarketplaceClientResult<ListOffersResponse> {
        self.http_client
            .list_offers(post_id, dealer_id, limit, offset)
            .await
    }
}
