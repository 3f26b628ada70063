use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публичная модель поста (запрос покупателя на автомобиль).
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Субъект identity-провайдера, создавший пост.
    pub user_id: String,
    /// Заголовок поста.
    pub title: String,
    /// Марка автомобиля.
    pub car_make: Option<String>,
    /// Модель автомобиля.
    pub car_model: Option<String>,
    /// Год выпуска.
    pub car_year: Option<String>,
    /// Почтовый индекс покупателя.
    pub zip_code: Option<String>,
    /// Радиус поиска.
    pub radius: Option<f64>,
    /// Максимальный пробег.
    pub mileage: Option<f64>,
    /// Комплектация.
    pub trim: Option<String>,
    /// Цвет.
    pub color: Option<String>,
    /// Тип привода.
    pub drivetrain: Option<String>,
    /// Ссылка на изображение.
    pub image_url: Option<String>,
    /// Бюджет покупателя.
    pub price: f64,
    /// Дополнительная информация.
    pub additional_information: Option<String>,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления поста (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Поля поста, которые отправляются при создании и обновлении.
pub struct PostInput {
    /// Заголовок поста (обязателен).
    pub title: String,
    /// Марка автомобиля.
    pub car_make: Option<String>,
    /// Модель автомобиля.
    pub car_model: Option<String>,
    /// Год выпуска.
    pub car_year: Option<String>,
    /// Почтовый индекс.
    pub zip_code: Option<String>,
    /// Радиус поиска.
    pub radius: Option<f64>,
    /// Максимальный пробег.
    pub mileage: Option<f64>,
    /// Комплектация.
    pub trim: Option<String>,
    /// Цвет.
    pub color: Option<String>,
    /// Тип привода.
    pub drivetrain: Option<String>,
    /// Ссылка на изображение.
    pub image_url: Option<String>,
    /// Бюджет (обязателен).
    pub price: f64,
    /// Дополнительная информация.
    pub additional_information: Option<String>,
}

impl From<&Post> for PostInput {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            car_make: post.car_make.clone(),
            car_model: post.car_model.clone(),
            car_year: post.car_year.clone(),
            zip_code: post.zip_code.clone(),
            radius: post.radius,
            mileage: post.mileage,
            trim: post.trim.clone(),
            color: post.color.clone(),
            drivetrain: post.drivetrain.clone(),
            image_url: post.image_url.clone(),
            price: post.price,
            additional_information: post.additional_information.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ списка постов с параметрами пагинации.
pub struct ListPostsResponse {
    /// Список постов на текущей странице.
    pub posts: Vec<Post>,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки.
    pub offset: u32,
    /// Общее количество постов.
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Статус оффера. Любой статус может быть заменён любым другим.
pub enum OfferStatus {
    /// Ожидает ответа (значение по умолчанию).
    #[default]
    Pending,
    /// Принят.
    Accept,
    /// Отклонён.
    Decline,
    /// Отменён.
    Cancel,
}

impl OfferStatus {
    /// Строковое представление статуса на проводе.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accept => "ACCEPT",
            Self::Decline => "DECLINE",
            Self::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACCEPT" => Ok(Self::Accept),
            "DECLINE" => Ok(Self::Decline),
            "CANCEL" => Ok(Self::Cancel),
            other => Err(format!(
                "unknown offer status `{other}`, expected PENDING, ACCEPT, DECLINE or CANCEL"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публичная модель оффера дилера.
pub struct Offer {
    /// Идентификатор оффера.
    pub id: i64,
    /// Пост, на который отвечает оффер.
    pub post_id: i64,
    /// Идентификатор автомобиля дилера.
    pub car_id: String,
    /// Субъект identity-провайдера, создавший оффер.
    pub dealer_id: String,
    /// Сообщение дилера.
    pub additional_message: Option<String>,
    /// Текущий статус.
    pub status: OfferStatus,
    /// Дата и время создания оффера (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления оффера (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Данные для создания оффера.
pub struct OfferInput {
    /// Пост, на который отвечает оффер.
    pub post_id: i64,
    /// Идентификатор автомобиля дилера.
    pub car_id: String,
    /// Сообщение дилера.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_message: Option<String>,
    /// Начальный статус; сервер подставит `PENDING`, если не указан.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OfferStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ списка офферов с параметрами пагинации.
pub struct ListOffersResponse {
    /// Список офферов на текущей странице.
    pub offers: Vec<Offer>,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки.
    pub offset: u32,
    /// Общее количество офферов.
    pub total: u64,
}
