pub(crate) mod offer_repository;
pub(crate) mod post_repository;
