use crate::data::offer_repository::{NewOffer, OfferFilter, OfferRepository};
use crate::data::post_repository::{Pagination, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::offer::{CreateOfferRequest, Offer, OfferStatus};
use crate::domain::post::normalize_owner_id;

#[derive(Debug, Clone)]
pub(crate) struct ListOffersResult {
    pub(crate) offers: Vec<Offer>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

pub(crate) struct OfferService<O: OfferRepository, P: PostRepository> {
    offers: O,
    posts: P,
}

impl<O: OfferRepository, P: PostRepository> OfferService<O, P> {
    pub(crate) fn new(offers: O, posts: P) -> Self {
        Self { offers, posts }
    }

    /// `post_id` is stored as given; the referenced post is not looked up.
    pub(crate) async fn create_offer(
        &self,
        dealer_id: &str,
        req: CreateOfferRequest,
    ) -> Result<Offer, DomainError> {
        let dealer_id = normalize_owner_id("dealer_id", dealer_id)?;
        let req = req.validate()?;

        let new_offer = NewOffer {
            post_id: req.post_id,
            car_id: req.car_id,
            dealer_id,
            additional_message: req.additional_message,
            status: req.status.unwrap_or_default(),
        };
        self.offers.create_offer(new_offer).await
    }

    pub(crate) async fn get_offer(&self, id: i64) -> Result<Offer, DomainError> {
        self.offers
            .get_offer(id)
            .await?
            .ok_or(DomainError::NotFound(format!("offer id: {id}")))
    }

    /// Overwrites the status whatever its current value is. Only the dealer who
    /// made the offer or the owner of the post it answers may do so.
    pub(crate) async fn update_offer_status(
        &self,
        actor_user_id: &str,
        offer_id: i64,
        status: OfferStatus,
    ) -> Result<Offer, DomainError> {
        let offer = self.get_offer(offer_id).await?;

        if !offer.is_made_by(actor_user_id) {
            let post_owner = self
                .posts
                .get_post(offer.post_id)
                .await?
                .map(|post| post.user_id);
            if post_owner.as_deref() != Some(actor_user_id) {
                return Err(DomainError::Forbidden);
            }
        }

        tracing::debug!(offer_id, from = %offer.status, to = %status, "offer status overwritten");

        self.offers
            .update_offer_status(offer_id, status)
            .await?
            .ok_or(DomainError::NotFound(format!("offer id: {offer_id}")))
    }

    pub(crate) async fn delete_offer(
        &self,
        actor_user_id: &str,
        offer_id: i64,
    ) -> Result<(), DomainError> {
        let offer = self.get_offer(offer_id).await?;

        if !offer.is_made_by(actor_user_id) {
            return Err(DomainError::Forbidden);
        }

        let deleted = self.offers.delete_offer(offer_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("offer id: {offer_id}")));
        }
        Ok(())
    }

    pub(crate) async fn list_offers(
        &self,
        filter: OfferFilter,
        pagination: Pagination,
    ) -> Result<ListOffersResult, DomainError> {
        let offers = self.offers.list_offers(&filter, pagination).await?;
        let total = self.offers.total_offers(&filter).await?;

        Ok(ListOffersResult {
            offers,
            limit: pagination.limit,
            offset: pagination.offset,
            total,
        })
    }
}
