use tracing::{debug, error, info};

use super::error::{IdentityError, ProfileError};
use super::identity::{IdentitySession, MetadataApi, TokenRequest, UserMetadata};
use super::notifications::{NotificationKind, Notifications};
use super::validation::{validate_phone_number, validate_user_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Итог одной попытки сохранить профиль.
pub enum SubmitOutcome {
    /// Имя пользователя не прошло проверку; запрос не отправлялся.
    InvalidUserName,
    /// Телефон не прошёл проверку; запрос не отправлялся.
    InvalidPhoneNumber,
    /// Метаданные сохранены.
    Updated,
    /// Токен или запрос завершились ошибкой.
    Failed,
}

/// Форма редактирования профиля поверх сессии identity-провайдера.
///
/// `submit` принимает `&mut self`, поэтому две отправки одной формы не могут
/// выполняться одновременно.
pub struct ProfileEditor<S, A> {
    session: S,
    api: A,
    token_request: TokenRequest,
    sub: String,
    email: Option<String>,
    role: Option<String>,
    user_name: String,
    phone_number: String,
    notifications: Notifications,
}

impl<S: IdentitySession, A: MetadataApi> ProfileEditor<S, A> {
    /// Создаёт форму, заполненную текущими метаданными пользователя сессии.
    pub fn new(session: S, api: A, token_request: TokenRequest) -> Result<Self, ProfileError> {
        let user = session.user().ok_or(ProfileError::NotAuthenticated)?;

        Ok(Self {
            session,
            api,
            token_request,
            sub: user.sub,
            email: user.email,
            role: user.role,
            user_name: user.user_name.unwrap_or_default(),
            phone_number: user.phone_number.unwrap_or_default(),
            notifications: Notifications::default(),
        })
    }

    /// Email пользователя (не редактируется).
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Роль пользователя (не редактируется).
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Текущее значение поля имени.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Текущее значение поля телефона.
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Меняет поле имени.
    pub fn set_user_name(&mut self, user_name: impl Into<String>) {
        self.user_name = user_name.into();
    }

    /// Меняет поле телефона.
    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.phone_number = phone_number.into();
    }

    /// Уведомления формы.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Уведомления формы для закрытия и автозакрытия.
    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Проверяет поля и отправляет не более одного `PATCH`.
    ///
    /// Перед каждой попыткой уведомления предыдущей попытки закрываются.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.notifications.clear();

        if let Err(err) = validate_user_name(&self.user_name) {
            debug!(error = %err, "profile not submitted");
            self.notifications.show(NotificationKind::NameWarning);
            return SubmitOutcome::InvalidUserName;
        }
        if let Err(err) = validate_phone_number(&self.phone_number) {
            debug!(error = %err, "profile not submitted");
            self.notifications.show(NotificationKind::PhoneWarning);
            return SubmitOutcome::InvalidPhoneNumber;
        }

        match self.push_metadata().await {
            Ok(()) => {
                info!(sub = %self.sub, "profile metadata updated");
                self.notifications.show(NotificationKind::Success);
                SubmitOutcome::Updated
            }
            Err(err) => {
                error!(error = %err, sub = %self.sub, "failed to update profile metadata");
                self.notifications.show(NotificationKind::Failure);
                SubmitOutcome::Failed
            }
        }
    }

    async fn push_metadata(&self) -> Result<(), ProfileError> {
        let access_token = self.acquire_token().await?;
        let metadata = UserMetadata {
            user_name: self.user_name.clone(),
            phone_number: self.phone_number.clone(),
        };

        self.api
            .update_user_metadata(&self.sub, &access_token, &metadata)
            .await
    }

    async fn acquire_token(&self) -> Result<String, IdentityError> {
        match self.session.token_silently(&self.token_request).await {
            Ok(token) => Ok(token),
            Err(err) => {
                debug!(error = %err, "silent token acquisition failed, trying interactive login");
                self.session.token_with_popup(&self.token_request).await
            }
        }
    }
}
