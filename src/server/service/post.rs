//! Posts, comments and likes, with the privacy gate for private authors.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        audit::AuditRepository,
        follow::FollowRepository,
        notification::NotificationRepository,
        post::{CommentRepository, LikeRepository, PostRepository},
        user::UserRepository,
        users_by_id,
    },
    error::{validation::ValidationError, AppError},
    model::{
        audit::{entity_type, RecordAuditParam},
        notification::{CreateNotificationParam, NotificationKind},
        post::{Comment, CommentView, Post, PostView},
        user::User,
        CursorPage, CursorRequest, PageRequest, Paginated,
    },
    service::follow::can_view,
};

const POST_MAX_LENGTH: usize = 10_000;
const COMMENT_MAX_LENGTH: usize = 2_000;

pub struct PostService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> PostService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, actor: &User, content: String) -> Result<PostView, AppError> {
        let content = validate_content("content", content, POST_MAX_LENGTH)?;

        let post = PostRepository::new(self.db)
            .create(actor.id, content)
            .await?;

        Ok(PostView {
            post,
            author: actor.clone(),
            like_count: 0,
            comment_count: 0,
            liked_by_viewer: false,
        })
    }

    /// A single post as seen by `viewer`.
    ///
    /// # Returns
    /// - `Ok(PostView)` - The post with counters
    /// - `Err(AppError::NotFound)` - Post or its author is gone
    /// - `Err(AppError::Forbidden)` - The author is private and the viewer does not follow them
    pub async fn get(&self, viewer: &User, post_id: i32) -> Result<PostView, AppError> {
        let post = self.find_visible(viewer, post_id).await?;

        self.decorate(viewer, vec![post])
            .await?
            .pop()
            .ok_or_else(post_not_found)
    }

    /// Replaces the content of the actor's own post.
    pub async fn update(
        &self,
        actor: &User,
        post_id: i32,
        content: String,
    ) -> Result<PostView, AppError> {
        let post = self.find(post_id).await?;
        if post.author_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the author can edit this post".to_string(),
            ));
        }

        let content = validate_content("content", content, POST_MAX_LENGTH)?;
        let post = PostRepository::new(self.db).update(post.id, content).await?;

        self.decorate(actor, vec![post])
            .await?
            .pop()
            .ok_or_else(post_not_found)
    }

    /// Soft deletes a post. The author or a platform admin.
    pub async fn delete(&self, actor: &User, post_id: i32) -> Result<(), AppError> {
        let post = self.find(post_id).await?;
        if post.author_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        PostRepository::new(&txn).soft_delete(post.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(actor.id, "post.deleted", entity_type::POST, post.id)
                    .details(serde_json::json!({ "author_id": post.author_id })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// The viewer's own posts and those of everyone they follow, newest first.
    pub async fn feed(
        &self,
        viewer: &User,
        cursor: CursorRequest,
    ) -> Result<CursorPage<PostView>, AppError> {
        let mut author_ids: Vec<i32> = FollowRepository::new(self.db)
            .following_ids(viewer.id)
            .await?
            .into_iter()
            .collect();
        author_ids.push(viewer.id);

        let page = PostRepository::new(self.db)
            .by_authors(&author_ids, cursor)
            .await?;

        self.decorate_page(viewer, page).await
    }

    /// Posts by one author, subject to the author's privacy setting.
    pub async fn by_author(
        &self,
        viewer: &User,
        author_id: i32,
        cursor: CursorRequest,
    ) -> Result<CursorPage<PostView>, AppError> {
        let author = self.find_author(author_id).await?;
        if !can_view(self.db, viewer.id, &author).await? {
            return Err(private_author());
        }

        let page = PostRepository::new(self.db)
            .by_authors(&[author.id], cursor)
            .await?;

        self.decorate_page(viewer, page).await
    }

    /// Comments on a post the actor can see. Notifies the post author unless they
    /// commented themselves.
    pub async fn add_comment(
        &self,
        actor: &User,
        post_id: i32,
        content: String,
    ) -> Result<CommentView, AppError> {
        let post = self.find_visible(actor, post_id).await?;
        let content = validate_content("content", content, COMMENT_MAX_LENGTH)?;

        let txn = self.db.begin().await?;
        let comment = CommentRepository::new(&txn)
            .create(post.id, actor.id, content)
            .await?;
        if post.author_id != actor.id {
            NotificationRepository::new(&txn)
                .create(
                    CreateNotificationParam::new(
                        post.author_id,
                        actor.id,
                        NotificationKind::PostCommented,
                        format!("{} commented on your post", actor.name),
                    )
                    .link(format!("/posts/{}", post.id)),
                )
                .await?;
        }
        txn.commit().await?;

        Ok(CommentView {
            comment,
            author: actor.clone(),
        })
    }

    pub async fn comments(
        &self,
        viewer: &User,
        post_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<CommentView>, AppError> {
        let post = self.find_visible(viewer, post_id).await?;

        let comments = CommentRepository::new(self.db)
            .list_for_post(post.id, page)
            .await?;
        let authors = users_by_id(self.db, comments.items.iter().map(|c| c.author_id)).await?;

        let items = comments
            .items
            .iter()
            .filter_map(|comment| {
                authors.get(&comment.author_id).map(|author| CommentView {
                    comment: comment.clone(),
                    author: author.clone(),
                })
            })
            .collect();

        Ok(comments.with_items(items))
    }

    /// Soft deletes a comment. The comment author, the post author or a platform admin.
    pub async fn delete_comment(&self, actor: &User, comment_id: i32) -> Result<(), AppError> {
        let comment = self.find_comment(comment_id).await?;
        let post = self.find(comment.post_id).await?;

        if comment.author_id != actor.id && post.author_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "You cannot delete this comment".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        CommentRepository::new(&txn).soft_delete(comment.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(
                    actor.id,
                    "comment.deleted",
                    entity_type::COMMENT,
                    comment.id,
                )
                .details(serde_json::json!({ "post_id": post.id })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Likes a post the actor can see. Notifies the post author unless self-liked.
    pub async fn like(&self, actor: &User, post_id: i32) -> Result<(), AppError> {
        let post = self.find_visible(actor, post_id).await?;

        if LikeRepository::new(self.db).exists(post.id, actor.id).await? {
            return Err(AppError::Conflict(
                "You already like this post".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        LikeRepository::new(&txn).create(post.id, actor.id).await?;
        if post.author_id != actor.id {
            NotificationRepository::new(&txn)
                .create(
                    CreateNotificationParam::new(
                        post.author_id,
                        actor.id,
                        NotificationKind::PostLiked,
                        format!("{} liked your post", actor.name),
                    )
                    .link(format!("/posts/{}", post.id)),
                )
                .await?;
        }
        txn.commit().await?;

        Ok(())
    }

    pub async fn unlike(&self, actor: &User, post_id: i32) -> Result<(), AppError> {
        let post = self.find(post_id).await?;

        if !LikeRepository::new(self.db).delete(post.id, actor.id).await? {
            return Err(AppError::NotFound(
                "You have not liked this post".to_string(),
            ));
        }

        Ok(())
    }

    async fn find(&self, post_id: i32) -> Result<Post, AppError> {
        PostRepository::new(self.db)
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)
    }

    async fn find_author(&self, author_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn find_comment(&self, comment_id: i32) -> Result<Comment, AppError> {
        CommentRepository::new(self.db)
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    async fn find_visible(&self, viewer: &User, post_id: i32) -> Result<Post, AppError> {
        let post = self.find(post_id).await?;
        let author = UserRepository::new(self.db)
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(post_not_found)?;

        if !can_view(self.db, viewer.id, &author).await? {
            return Err(private_author());
        }

        Ok(post)
    }

    async fn decorate_page(
        &self,
        viewer: &User,
        page: CursorPage<Post>,
    ) -> Result<CursorPage<PostView>, AppError> {
        let next_cursor = page.next_cursor;
        let items = self.decorate(viewer, page.items).await?;

        Ok(CursorPage { items, next_cursor })
    }

    /// Attaches authors and counters. Posts whose author was deleted are dropped.
    async fn decorate(&self, viewer: &User, posts: Vec<Post>) -> Result<Vec<PostView>, AppError> {
        let post_ids: Vec<i32> = posts.iter().map(|post| post.id).collect();

        let authors = users_by_id(self.db, posts.iter().map(|post| post.author_id)).await?;
        let like_repo = LikeRepository::new(self.db);
        let like_counts = like_repo.count_for_posts(&post_ids).await?;
        let liked = like_repo.liked_by(viewer.id, &post_ids).await?;
        let comment_counts = CommentRepository::new(self.db)
            .count_for_posts(&post_ids)
            .await?;

        Ok(posts
            .into_iter()
            .filter_map(|post| {
                let author = authors.get(&post.author_id)?.clone();
                Some(PostView {
                    like_count: like_counts.get(&post.id).copied().unwrap_or(0),
                    comment_count: comment_counts.get(&post.id).copied().unwrap_or(0),
                    liked_by_viewer: liked.contains(&post.id),
                    author,
                    post,
                })
            })
            .collect())
    }
}

fn validate_content(
    field: &'static str,
    content: String,
    max: usize,
) -> Result<String, ValidationError> {
    let content = content.trim().to_string();

    let mut errors = ValidationError::new();
    errors.check_length(field, &content, 1, max);
    errors.finish()?;

    Ok(content)
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

fn private_author() -> AppError {
    AppError::Forbidden("This account is private".to_string())
}
