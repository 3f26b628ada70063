//! Редактор профиля пользователя у identity-провайдера.
//!
//! Редактор проверяет имя пользователя и номер телефона, получает токен
//! Management API (сначала без взаимодействия, затем интерактивно) и
//! отправляет один `PATCH` с новыми `user_metadata`. Результат каждой попытки
//! отражается ровно одним уведомлением из [`NotificationKind`].

mod editor;
mod error;
mod greeting;
mod identity;
mod notifications;
mod validation;

pub use editor::{ProfileEditor, SubmitOutcome};
pub use error::{IdentityError, ProfileError};
pub use greeting::{greeting, greeting_now};
pub use identity::{
    IdentitySession, IdentityUser, MANAGEMENT_API_SCOPE, ManagementApiClient, MetadataApi,
    TokenRequest, UserMetadata,
};
pub use notifications::{AUTO_HIDE_AFTER, NotificationKind, Notifications};
pub use validation::{
    MIN_USER_NAME_LEN, PHONE_NUMBER_LEN, ProfileValidationError, validate_phone_number,
    validate_user_name,
};
