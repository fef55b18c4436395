//! Profiles: lookup with counters, editing and search.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        follow::FollowRepository, post::PostRepository, user::UserRepository,
    },
    error::{validation::ValidationError, AppError},
    model::{
        user::{is_valid_username, Profile, UpdateProfileParam, User},
        PageRequest, Paginated,
    },
    service::follow::FollowService,
};

/// Service providing business logic for user profiles.
pub struct UserService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves an active user by id.
    ///
    /// # Returns
    /// - `Ok(User)` - The user
    /// - `Err(AppError::NotFound)` - No such user, or the account was deleted
    pub async fn get_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Builds the profile of `user_id` as seen by `viewer_id`.
    ///
    /// Counters are always visible, even for private accounts. Only the content
    /// behind them is gated by the follow relationship.
    ///
    /// # Arguments
    /// - `viewer_id` - The user looking at the profile
    /// - `user_id` - The profile owner
    ///
    /// # Returns
    /// - `Ok(Profile)` - User with follower, following and post counts and the relationship
    /// - `Err(AppError::NotFound)` - Profile owner does not exist
    pub async fn get_profile(&self, viewer_id: i32, user_id: i32) -> Result<Profile, AppError> {
        let user = self.get_user(user_id).await?;

        let follow_repo = FollowRepository::new(self.db);
        let follower_count = follow_repo.follower_count(user.id).await?;
        let following_count = follow_repo.following_count(user.id).await?;
        let post_count = PostRepository::new(self.db)
            .count_by_author(user.id)
            .await?;
        let relationship = FollowService::new(self.db)
            .relationship(viewer_id, user.id)
            .await?;

        Ok(Profile {
            user,
            follower_count,
            following_count,
            post_count,
            relationship,
        })
    }

    /// Updates the actor's own profile.
    ///
    /// Switching a private account to public accepts every pending follow request in
    /// the same transaction as the profile write.
    ///
    /// # Returns
    /// - `Ok(User)` - The updated user
    /// - `Err(AppError::Validation)` - One or more fields are out of range
    /// - `Err(AppError::Conflict)` - The username belongs to someone else
    pub async fn update_profile(
        &self,
        actor: &User,
        param: UpdateProfileParam,
    ) -> Result<User, AppError> {
        let param = normalize_profile(param);
        validate_profile(&param)?;

        let user_repo = UserRepository::new(self.db);
        if param.username != actor.username && user_repo.username_exists(&param.username).await? {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let going_public = actor.is_private && !param.is_private;

        let txn = self.db.begin().await?;
        let updated = UserRepository::new(&txn)
            .update_profile(actor.id, param)
            .await?;

        if going_public {
            let accepted = FollowService::accept_all_pending(&txn, &updated).await?;
            if accepted > 0 {
                tracing::info!(
                    "User {} went public, accepted {} pending follow requests",
                    updated.id,
                    accepted
                );
            }
        }

        txn.commit().await?;

        Ok(updated)
    }

    /// Case-insensitive search over names and usernames.
    ///
    /// A blank query returns an empty page instead of every user.
    pub async fn search(&self, query: &str, page: PageRequest) -> Result<Paginated<User>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Paginated {
                items: Vec::new(),
                total: 0,
                page: page.page,
                per_page: page.per_page,
                total_pages: 0,
            });
        }

        Ok(UserRepository::new(self.db).search(query, page).await?)
    }
}

fn normalize_profile(param: UpdateProfileParam) -> UpdateProfileParam {
    fn blank_to_none(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    UpdateProfileParam {
        name: param.name.trim().to_string(),
        username: param.username.trim().to_lowercase(),
        headline: blank_to_none(param.headline),
        bio: blank_to_none(param.bio),
        avatar_url: blank_to_none(param.avatar_url),
        is_private: param.is_private,
    }
}

fn validate_profile(param: &UpdateProfileParam) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();

    errors.check_length("name", &param.name, 1, 100);
    errors.check(
        "username",
        is_valid_username(&param.username),
        "must be 3 to 30 characters of a-z, 0-9 or _",
    );
    errors.check_max_length("headline", param.headline.as_deref(), 160);
    errors.check_max_length("bio", param.bio.as_deref(), 2000);
    errors.check_max_length("avatar_url", param.avatar_url.as_deref(), 2048);
    if let Some(avatar_url) = &param.avatar_url {
        errors.check(
            "avatar_url",
            url::Url::parse(avatar_url).is_ok(),
            "must be an absolute URL",
        );
    }

    errors.finish()
}
