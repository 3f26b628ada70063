use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки получения токена у identity-провайдера.
pub enum IdentityError {
    /// Токен нельзя получить без участия пользователя.
    #[error("user interaction required: {0}")]
    InteractionRequired(String),

    /// Пользователь закрыл окно входа или отказался.
    #[error("login was cancelled")]
    Cancelled,

    /// Любая другая ошибка провайдера.
    #[error("identity provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Error)]
/// Ошибки обновления профиля.
pub enum ProfileError {
    /// В сессии нет аутентифицированного пользователя.
    #[error("no authenticated user")]
    NotAuthenticated,

    /// Не удалось получить токен ни одним способом.
    #[error("access token acquisition failed: {0}")]
    Token(#[from] IdentityError),

    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Management API ответил статусом вне диапазона 2xx.
    #[error("management api responded with {status}: {body}")]
    Status {
        /// HTTP-статус ответа.
        status: u16,
        /// Тело ответа как есть.
        body: String,
    },

    /// Из домена identity-провайдера не получается корректный URL.
    #[error("invalid identity domain `{0}`")]
    InvalidDomain(String),
}
