use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{MarketplaceClientError, MarketplaceClientResult};
use crate::models::{
    ListOffersResponse, ListPostsResponse, Offer, OfferInput, OfferStatus, Post, PostInput,
};

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateOfferStatusDto {
    status: OfferStatus,
}

#[derive(Debug, Deserialize)]
struct ListPostsResponseDto {
    posts: Vec<Post>,
    limit: u32,
    offset: u32,
    total: i64,
}

#[derive(Debug, Deserialize)]
struct ListOffersResponseDto {
    offers: Vec<Offer>,
    limit: u32,
    offset: u32,
    total: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListPostsQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    limit: u32,
    offset: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOffersQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    post_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dealer_id: Option<&'a str>,
    limit: u32,
    offset: u32,
}

impl From<ListPostsResponseDto> for ListPostsResponse {
    fn from(value: ListPostsResponseDto) -> Self {
        Self {
            posts: value.posts,
            limit: value.limit,
            offset: value.offset,
            total: value.total.max(0) as u64,
        }
    }
}

impl From<ListOffersResponseDto> for ListOffersResponse {
    fn from(value: ListOffersResponseDto) -> Self {
        Self {
            offers: value.offers,
            limit: value.limit,
            offset: value.offset,
            total: value.total.max(0) as u64,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `marketplace-server`.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub(crate) fn new(base_url: impl Into<String>) -> MarketplaceClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: Response) -> MarketplaceClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        MarketplaceClientError::from_http_status(status, Some(message))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// отправляет запрос и превращает не-2xx ответ в ошибку клиента
    async fn execute(request: RequestBuilder) -> MarketplaceClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(MarketplaceClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn read_json<TRes: DeserializeOwned>(
        request: RequestBuilder,
    ) -> MarketplaceClientResult<TRes> {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(MarketplaceClientError::from_reqwest)
    }

    /// Создаёт пост от имени авторизованного пользователя.
    pub(crate) async fn create_post(
        &self,
        token: &str,
        input: &PostInput,
    ) -> MarketplaceClientResult<Post> {
        Self::read_json(self.request(Method::POST, "/api/posts", Some(token)).json(input)).await
    }

    /// Получает пост по идентификатору.
    pub(crate) async fn get_post(&self, id: i64) -> MarketplaceClientResult<Post> {
        Self::read_json(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await
    }

    /// Полностью заменяет редактируемые поля поста.
    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: i64,
        input: &PostInput,
    ) -> MarketplaceClientResult<Post> {
        let request = self
            .request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
            .json(input);
        Self::read_json(request).await
    }

    /// Удаляет пост по идентификатору.
    pub(crate) async fn delete_post(&self, token: &str, id: i64) -> MarketplaceClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/api/posts/{id}"), Some(token)))
            .await?;
        Ok(())
    }

    /// Возвращает список постов с пагинацией `limit/offset`.
    pub(crate) async fn list_posts(
        &self,
        user_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> MarketplaceClientResult<ListPostsResponse> {
        let query = ListPostsQuery {
            user_id,
            limit,
            offset,
        };
        let dto: ListPostsResponseDto =
            Self::read_json(self.request(Method::GET, "/api/posts", None).query(&query)).await?;
        Ok(dto.into())
    }

    /// Создаёт оффер от имени авторизованного дилера.
    pub(crate) async fn create_offer(
        &self,
        token: &str,
        input: &OfferInput,
    ) -> MarketplaceClientResult<Offer> {
        Self::read_json(self.request(Method::POST, "/api/offers", Some(token)).json(input)).await
    }

    /// Получает оффер по идентификатору.
    pub(crate) async fn get_offer(&self, id: i64) -> MarketplaceClientResult<Offer> {
        Self::read_json(self.request(Method::GET, &format!("/api/offers/{id}"), None)).await
    }

    /// Перезаписывает статус оффера.
    pub(crate) async fn update_offer_status(
        &self,
        token: &str,
        id: i64,
        status: OfferStatus,
    ) -> MarketplaceClientResult<Offer> {
        let request = self
            .request(
                Method::PATCH,
                &format!("/api/offers/{id}/status"),
                Some(token),
            )
            .json(&UpdateOfferStatusDto { status });
        Self::read_json(request).await
    }

    /// Удаляет оффер по идентификатору.
    pub(crate) async fn delete_offer(&self, token: &str, id: i64) -> MarketplaceClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/api/offers/{id}"), Some(token)))
            .await?;
        Ok(())
    }

    /// Возвращает офферы с необязательными фильтрами по посту и дилеру.
    pub(crate) async fn list_offers(
        &self,
        post_id: Option<i64>,
        dealer_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> MarketplaceClientResult<ListOffersResponse> {
        let query = ListOffersQuery {
            post_id,
            dealer_id,
            limit,
            offset,
        };
        let dto: ListOffersResponseDto =
            Self::read_json(self.request(Method::GET, "/api/offers", None).query(&query)).await?;
        Ok(dto.into())
    }
}
