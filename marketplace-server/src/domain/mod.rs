pub(crate) mod error;
pub(crate) mod offer;
pub(crate) mod post;
