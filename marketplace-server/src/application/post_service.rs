use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostFields, normalize_owner_id};

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(
        &self,
        user_id: &str,
        fields: PostFields,
    ) -> Result<Post, DomainError> {
        let user_id = normalize_owner_id("user_id", user_id)?;
        let fields = fields.validate()?;

        self.repo.create_post(NewPost { user_id, fields }).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: &str,
        post_id: i64,
        fields: PostFields,
    ) -> Result<Post, DomainError> {
        let fields = fields.validate()?;

        if let Some(post) = self
            .repo
            .update_post_owned(post_id, actor_user_id, fields)
            .await?
        {
            return Ok(post);
        }

        // nothing updated: tell "missing" apart from "not yours"
        match self.repo.get_post(post_id).await? {
            Some(_) => Err(DomainError::Forbidden),
            None => Err(DomainError::NotFound(format!("post id: {post_id}"))),
        }
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: &str,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let original_post = self
            .repo
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;

        if !original_post.is_owned_by(actor_user_id) {
            return Err(DomainError::Forbidden);
        }

        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<ListPostsResult, DomainError> {
        let posts = self.repo.list_posts(&filter, pagination).await?;
        let total = self.repo.total_posts(&filter).await?;

        Ok(ListPostsResult {
            posts,
            limit: pagination.limit,
            offset: pagination.offset,
            total,
        })
    }
}
