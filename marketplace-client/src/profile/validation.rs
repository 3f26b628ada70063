use thiserror::Error;

/// Минимальная длина имени пользователя в символах.
pub const MIN_USER_NAME_LEN: usize = 6;
/// Точная длина номера телефона.
pub const PHONE_NUMBER_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
/// Ошибки локальной проверки полей профиля.
pub enum ProfileValidationError {
    /// Имя пользователя короче [`MIN_USER_NAME_LEN`].
    #[error("user name must be at least {MIN_USER_NAME_LEN} characters long")]
    UserNameTooShort,

    /// Телефон не состоит ровно из [`PHONE_NUMBER_LEN`] цифр.
    #[error("phone number must be exactly {PHONE_NUMBER_LEN} digits")]
    InvalidPhoneNumber,
}

/// Проверяет, что имя пользователя содержит не меньше шести символов.
pub fn validate_user_name(user_name: &str) -> Result<(), ProfileValidationError> {
    if user_name.chars().count() < MIN_USER_NAME_LEN {
        return Err(ProfileValidationError::UserNameTooShort);
    }
    Ok(())
}

/// Проверяет, что телефон состоит ровно из десяти ASCII-цифр.
pub fn validate_phone_number(phone_number: &str) -> Result<(), ProfileValidationError> {
    let digits_only = phone_number.bytes().all(|b| b.is_ascii_digit());
    if phone_number.len() != PHONE_NUMBER_LEN || !digits_only {
        return Err(ProfileValidationError::InvalidPhoneNumber);
    }
    Ok(())
}
