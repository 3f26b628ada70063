use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::DomainError;
use super::post::{normalize_optional, normalize_owner_id};

/// Offer status is a plain label: any value may replace any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum OfferStatus {
    #[default]
    Pending,
    Accept,
    Decline,
    Cancel,
}

impl OfferStatus {
    pub(crate) const ALL: [OfferStatus; 4] = [
        OfferStatus::Pending,
        OfferStatus::Accept,
        OfferStatus::Decline,
        OfferStatus::Cancel,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Pending => "PENDING",
            OfferStatus::Accept => "ACCEPT",
            OfferStatus::Decline => "DECLINE",
            OfferStatus::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or(DomainError::Validation {
                field: "status",
                message: "must be one of PENDING, ACCEPT, DECLINE, CANCEL",
            })
    }
}

/// Dealer response to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Offer {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) car_id: String,
    pub(crate) dealer_id: String,
    pub(crate) additional_message: Option<String>,
    pub(crate) status: OfferStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreateOfferRequest {
    pub(crate) post_id: i64,
    pub(crate) car_id: String,
    pub(crate) additional_message: Option<String>,
    pub(crate) status: Option<OfferStatus>,
}

impl CreateOfferRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_post_id(self.post_id)?;
        Ok(Self {
            post_id: self.post_id,
            car_id: normalize_owner_id("car_id", &self.car_id)?,
            additional_message: normalize_optional(self.additional_message),
            status: self.status,
        })
    }
}

impl Offer {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: i64,
        post_id: i64,
        car_id: impl Into<String>,
        dealer_id: impl Into<String>,
        additional_message: Option<String>,
        status: OfferStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        validate_post_id(post_id)?;
        let car_id = normalize_owner_id("car_id", &car_id.into())?;
        let dealer_id = normalize_owner_id("dealer_id", &dealer_id.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            post_id,
            car_id,
            dealer_id,
            additional_message: normalize_optional(additional_message),
            status,
            created_at,
            updated_at,
        })
    }

    pub(crate) fn is_made_by(&self, dealer_id: &str) -> bool {
        self.dealer_id == dealer_id
    }
}

fn validate_post_id(post_id: i64) -> Result<(), DomainError> {
    if post_id <= 0 {
        return Err(DomainError::Validation {
            field: "post_id",
            message: "must be > 0",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CreateOfferRequest, DomainError, Offer, OfferStatus};

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(OfferStatus::default(), OfferStatus::Pending);
    }

    #[test]
    fn status_parses_every_label() {
        for status in OfferStatus::ALL {
            let parsed: OfferStatus = status.as_str().parse().expect("label must parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_rejects_unknown_and_lowercase_labels() {
        assert!("ACCEPTED".parse::<OfferStatus>().is_err());
        assert!("pending".parse::<OfferStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_upper_case() {
        let json = serde_json::to_string(&OfferStatus::Decline).expect("serialize");
        assert_eq!(json, "\"DECLINE\"");
    }

    #[test]
    fn create_request_requires_car_id() {
        let req = CreateOfferRequest {
            post_id: 1,
            car_id: "  ".to_string(),
            additional_message: None,
            status: None,
        };

        match req.validate().expect_err("car_id must be rejected") {
            DomainError::Validation { field, .. } => assert_eq!(field, "car_id"),
            _ => panic!("expected DomainError::Validation"),
        }
    }

    #[test]
    fn create_request_rejects_non_positive_post_id() {
        let req = CreateOfferRequest {
            post_id: 0,
            car_id: "car-1".to_string(),
            additional_message: None,
            status: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn offer_new_trims_message() {
        let now = Utc::now();
        let offer = Offer::new(
            1,
            2,
            "car-9",
            "auth0|dealer",
            Some("  best price in town ".to_string()),
            OfferStatus::Pending,
            now,
            now,
        )
        .expect("offer must be valid");

        assert_eq!(
            offer.additional_message.as_deref(),
            Some("best price in town")
        );
        assert!(offer.is_made_by("auth0|dealer"));
    }
}
