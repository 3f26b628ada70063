use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Car request published by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) user_id: String,
    pub(crate) fields: PostFields,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// User-editable part of a post. Used both for creation and full replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PostFields {
    pub(crate) title: String,
    pub(crate) car_make: Option<String>,
    pub(crate) car_model: Option<String>,
    pub(crate) car_year: Option<String>,
    pub(crate) zip_code: Option<String>,
    pub(crate) radius: Option<f64>,
    pub(crate) mileage: Option<f64>,
    pub(crate) trim: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) drivetrain: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) price: f64,
    pub(crate) additional_information: Option<String>,
}

impl PostFields {
    /// Only presence of the required fields is checked; optional text is trimmed
    /// and blank values collapse to `None`.
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            car_make: normalize_optional(self.car_make),
            car_model: normalize_optional(self.car_model),
            car_year: normalize_optional(self.car_year),
            zip_code: normalize_optional(self.zip_code),
            radius: validate_optional_number("radius", self.radius)?,
            mileage: validate_optional_number("mileage", self.mileage)?,
            trim: normalize_optional(self.trim),
            color: normalize_optional(self.color),
            drivetrain: normalize_optional(self.drivetrain),
            image_url: normalize_optional(self.image_url),
            price: validate_number("price", self.price)?,
            additional_information: normalize_optional(self.additional_information),
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        user_id: impl Into<String>,
        fields: PostFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let user_id = normalize_owner_id("user_id", &user_id.into())?;
        let fields = fields.validate()?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            user_id,
            fields,
            created_at,
            updated_at,
        })
    }

    pub(crate) fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

pub(crate) fn normalize_owner_id(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation {
            field,
            message: "must not be blank",
        });
    }
    Ok(value.to_string())
}

pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation {
            field: "title",
            message: "must not be blank",
        });
    }
    Ok(title.to_string())
}

fn validate_number(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::Validation {
            field,
            message: "must be a finite number",
        });
    }
    Ok(value)
}

fn validate_optional_number(
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, DomainError> {
    value.map(|value| validate_number(field, value)).transpose()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{DomainError, Post, PostFields, normalize_optional, normalize_owner_id};

    #[test]
    fn validate_rejects_blank_title() {
        let fields = PostFields {
            title: "   ".to_string(),
            price: 15000.0,
            ..Default::default()
        };

        let err = fields.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn validate_rejects_non_finite_price() {
        let fields = PostFields {
            title: "Looking for a sedan".to_string(),
            price: f64::NAN,
            ..Default::default()
        };

        let err = fields.validate().expect_err("price must be rejected");
        assert_validation_field(err, "price");
    }

    #[test]
    fn validate_trims_title_and_drops_blank_optionals() {
        let fields = PostFields {
            title: "  Civic wanted  ".to_string(),
            car_make: Some("  Honda ".to_string()),
            color: Some("   ".to_string()),
            price: 18000.0,
            ..Default::default()
        };

        let validated = fields.validate().expect("must validate");
        assert_eq!(validated.title, "Civic wanted");
        assert_eq!(validated.car_make.as_deref(), Some("Honda"));
        assert!(validated.color.is_none());
    }

    #[test]
    fn validate_accepts_long_title() {
        let fields = PostFields {
            title: "V8 ".repeat(200),
            price: 50000.0,
            ..Default::default()
        };

        let validated = fields.validate().expect("long title must validate");
        assert_eq!(validated.title.len(), 599);
    }

    #[test]
    fn owner_id_has_no_upper_bound() {
        let subject = format!("auth0|{}", "a".repeat(300));
        assert_eq!(
            normalize_owner_id("car_id", &subject).expect("long id must pass"),
            subject
        );
    }

    #[test]
    fn validate_accepts_any_finite_price() {
        let fields = PostFields {
            title: "Anything goes".to_string(),
            price: 0.0,
            ..Default::default()
        };

        assert!(fields.validate().is_ok());
    }

    #[test]
    fn post_new_rejects_blank_user_id() {
        let now = Utc::now();
        let err = Post::new(1, "  ", sample_fields(), now, now).expect_err("user_id is required");
        assert_validation_field(err, "user_id");
    }

    #[test]
    fn post_new_rejects_updated_before_created() {
        let updated_at = Utc::now();
        let created_at = updated_at + Duration::seconds(1);

        let err = Post::new(1, "auth0|user", sample_fields(), created_at, updated_at)
            .expect_err("updated_at < created_at must fail");
        assert_validation_field(err, "updated_at");
    }

    #[test]
    fn post_ownership_is_exact_match() {
        let now = Utc::now();
        let post = Post::new(3, "auth0|owner", sample_fields(), now, now).expect("valid post");

        assert!(post.is_owned_by("auth0|owner"));
        assert!(!post.is_owned_by("auth0|other"));
    }

    #[test]
    fn normalize_optional_keeps_non_blank_values() {
        assert_eq!(
            normalize_optional(Some(" AWD ".to_string())).as_deref(),
            Some("AWD")
        );
        assert!(normalize_optional(None).is_none());
    }

    fn sample_fields() -> PostFields {
        PostFields {
            title: "Need a truck".to_string(),
            price: 30000.0,
            ..Default::default()
        }
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
