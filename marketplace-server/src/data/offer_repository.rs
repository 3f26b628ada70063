use async_trait::async_trait;

use super::post_repository::Pagination;
use crate::domain::error::DomainError;
use crate::domain::offer::{Offer, OfferStatus};

#[derive(Debug, Clone)]
pub(crate) struct NewOffer {
    pub(crate) post_id: i64,
    pub(crate) car_id: String,
    pub(crate) dealer_id: String,
    pub(crate) additional_message: Option<String>,
    pub(crate) status: OfferStatus,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct OfferFilter {
    pub(crate) post_id: Option<i64>,
    pub(crate) dealer_id: Option<String>,
}

#[async_trait]
pub(crate) trait OfferRepository: Send + Sync {
    async fn create_offer(&self, input: NewOffer) -> Result<Offer, DomainError>;
    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, DomainError>;
    async fn update_offer_status(
        &self,
        id: i64,
        status: OfferStatus,
    ) -> Result<Option<Offer>, DomainError>;
    async fn delete_offer(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_offers(
        &self,
        filter: &OfferFilter,
        pagination: Pagination,
    ) -> Result<Vec<Offer>, DomainError>;
    async fn total_offers(&self, filter: &OfferFilter) -> Result<i64, DomainError>;
}
