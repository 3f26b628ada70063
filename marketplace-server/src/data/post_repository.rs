use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostFields};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) user_id: String,
    pub(crate) fields: PostFields,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) limit: u32,
    pub(crate) offset: u32,
}

impl Pagination {
    pub(crate) fn limit(self) -> i64 {
        i64::from(self.limit)
    }

    pub(crate) fn offset(self) -> i64 {
        i64::from(self.offset)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostFilter {
    pub(crate) user_id: Option<String>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: &str,
        fields: PostFields,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;
    async fn total_posts(&self, filter: &PostFilter) -> Result<i64, DomainError>;
}
