pub(crate) mod offer_service;
pub(crate) mod post_service;
