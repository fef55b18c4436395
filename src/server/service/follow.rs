//! Follow graph and the follow-request state machine.
//!
//! Following a public user creates the edge immediately. Following a private user opens
//! a pending request that only the target can accept or reject and only the requester
//! can cancel. Every transition out of pending is a conditional update, so a request that
//! already reached a terminal state reports a conflict instead of being overwritten.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};

use crate::server::{
    data::{
        follow::{FollowRepository, FollowRequestRepository},
        notification::NotificationRepository,
        user::UserRepository,
        users_by_id,
    },
    error::AppError,
    model::{
        follow::{FollowOutcome, FollowRequest, FollowRequestStatus},
        notification::{CreateNotificationParam, NotificationKind},
        user::{Relationship, User},
        PageRequest, Paginated,
    },
};

/// Whether `viewer_id` may see content owned by `owner`.
///
/// Public accounts are visible to everyone. Private accounts only to themselves and
/// their followers.
pub(crate) async fn can_view<C: ConnectionTrait>(
    db: &C,
    viewer_id: i32,
    owner: &User,
) -> Result<bool, DbErr> {
    if !owner.is_private || owner.id == viewer_id {
        return Ok(true);
    }

    FollowRepository::new(db).exists(viewer_id, owner.id).await
}

/// Accepts a pending request on `db`: marks it accepted, creates the edge and notifies
/// the requester.
///
/// # Returns
/// - `Ok(true)` - The request was pending and is now accepted
/// - `Ok(false)` - The request had already left the pending state
pub(crate) async fn accept_request<C: ConnectionTrait>(
    db: &C,
    request: &FollowRequest,
    target: &User,
) -> Result<bool, DbErr> {
    let request_repo = FollowRequestRepository::new(db);
    let follow_repo = FollowRepository::new(db);

    if !request_repo
        .set_status(request.id, FollowRequestStatus::Accepted)
        .await?
    {
        return Ok(false);
    }

    if !follow_repo
        .exists(request.requester_id, request.target_id)
        .await?
    {
        follow_repo
            .create(request.requester_id, request.target_id)
            .await?;
    }

    NotificationRepository::new(db)
        .create(
            CreateNotificationParam::new(
                request.requester_id,
                target.id,
                NotificationKind::FollowAccepted,
                format!("{} accepted your follow request", target.name),
            )
            .link(format!("/users/{}", target.id)),
        )
        .await?;

    Ok(true)
}

pub struct FollowService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> FollowService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Follows `target_id`, or asks to when the target is private.
    ///
    /// # Returns
    /// - `Ok(FollowOutcome::Followed)` - Public target, the edge was created
    /// - `Ok(FollowOutcome::Requested)` - Private target, a pending request was opened
    /// - `Err(AppError::BadRequest)` - Attempt to follow oneself
    /// - `Err(AppError::NotFound)` - Target does not exist or was deleted
    /// - `Err(AppError::Conflict)` - Already following, or a request is already pending
    pub async fn follow(&self, actor: &User, target_id: i32) -> Result<FollowOutcome, AppError> {
        if actor.id == target_id {
            return Err(AppError::BadRequest("You cannot follow yourself".to_string()));
        }

        let target = UserRepository::new(self.db)
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let follow_repo = FollowRepository::new(self.db);
        if follow_repo.exists(actor.id, target.id).await? {
            return Err(AppError::Conflict(
                "You already follow this user".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let notification_repo = NotificationRepository::new(&txn);

        let outcome = if target.is_private {
            let request_repo = FollowRequestRepository::new(&txn);
            if request_repo.find_pending(actor.id, target.id).await?.is_some() {
                return Err(AppError::Conflict(
                    "A follow request is already pending".to_string(),
                ));
            }

            let request = request_repo.create(actor.id, target.id).await?;
            notification_repo
                .create(
                    CreateNotificationParam::new(
                        target.id,
                        actor.id,
                        NotificationKind::FollowRequest,
                        format!("{} requested to follow you", actor.name),
                    )
                    .link("/follow-requests"),
                )
                .await?;

            FollowOutcome::Requested(request)
        } else {
            FollowRepository::new(&txn).create(actor.id, target.id).await?;
            notification_repo
                .create(
                    CreateNotificationParam::new(
                        target.id,
                        actor.id,
                        NotificationKind::NewFollower,
                        format!("{} started following you", actor.name),
                    )
                    .link(format!("/users/{}", actor.id)),
                )
                .await?;

            FollowOutcome::Followed
        };

        txn.commit().await?;

        Ok(outcome)
    }

    pub async fn unfollow(&self, actor: &User, target_id: i32) -> Result<(), AppError> {
        let deleted = FollowRepository::new(self.db)
            .delete(actor.id, target_id)
            .await?;

        if !deleted {
            return Err(AppError::NotFound(
                "You do not follow this user".to_string(),
            ));
        }

        Ok(())
    }

    /// Drops `follower_id` from the actor's followers.
    pub async fn remove_follower(&self, actor: &User, follower_id: i32) -> Result<(), AppError> {
        let deleted = FollowRepository::new(self.db)
            .delete(follower_id, actor.id)
            .await?;

        if !deleted {
            return Err(AppError::NotFound(
                "This user does not follow you".to_string(),
            ));
        }

        Ok(())
    }

    /// Accepts a pending request addressed to the actor.
    ///
    /// # Returns
    /// - `Ok(FollowRequest)` - The request, now accepted
    /// - `Err(AppError::NotFound)` - No request with that id
    /// - `Err(AppError::Forbidden)` - The request is addressed to someone else
    /// - `Err(AppError::Conflict)` - The request is no longer pending
    pub async fn accept(&self, actor: &User, request_id: i32) -> Result<FollowRequest, AppError> {
        let request = self.find_request(request_id).await?;
        if request.target_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the requested user can accept this request".to_string(),
            ));
        }
        ensure_pending(&request, FollowRequestStatus::Accepted)?;

        let txn = self.db.begin().await?;
        if !accept_request(&txn, &request, actor).await? {
            return Err(not_pending());
        }
        txn.commit().await?;

        self.find_request(request_id).await
    }

    pub async fn reject(&self, actor: &User, request_id: i32) -> Result<FollowRequest, AppError> {
        let request = self.find_request(request_id).await?;
        if request.target_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the requested user can reject this request".to_string(),
            ));
        }

        self.close(request, FollowRequestStatus::Rejected).await
    }

    pub async fn cancel(&self, actor: &User, request_id: i32) -> Result<FollowRequest, AppError> {
        let request = self.find_request(request_id).await?;
        if request.requester_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the requester can cancel this request".to_string(),
            ));
        }

        self.close(request, FollowRequestStatus::Cancelled).await
    }

    /// Pending requests addressed to the actor, each with its requester.
    pub async fn incoming_requests(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Paginated<(FollowRequest, User)>, AppError> {
        let requests = FollowRequestRepository::new(self.db)
            .incoming(actor.id, page)
            .await?;

        self.with_users(requests, |request| request.requester_id)
            .await
    }

    /// Pending requests the actor sent, each with its target.
    pub async fn outgoing_requests(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Paginated<(FollowRequest, User)>, AppError> {
        let requests = FollowRequestRepository::new(self.db)
            .outgoing(actor.id, page)
            .await?;

        self.with_users(requests, |request| request.target_id).await
    }

    pub async fn relationship(&self, viewer_id: i32, target_id: i32) -> Result<Relationship, AppError> {
        if viewer_id == target_id {
            return Ok(Relationship::None);
        }

        if FollowRepository::new(self.db)
            .exists(viewer_id, target_id)
            .await?
        {
            return Ok(Relationship::Following);
        }

        let pending = FollowRequestRepository::new(self.db)
            .find_pending(viewer_id, target_id)
            .await?;

        Ok(match pending {
            Some(_) => Relationship::Pending,
            None => Relationship::None,
        })
    }

    pub async fn followers(
        &self,
        viewer: &User,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<User>, AppError> {
        self.ensure_visible(viewer, user_id).await?;

        Ok(FollowRepository::new(self.db)
            .followers(user_id, page)
            .await?)
    }

    pub async fn following(
        &self,
        viewer: &User,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<User>, AppError> {
        self.ensure_visible(viewer, user_id).await?;

        Ok(FollowRepository::new(self.db)
            .following(user_id, page)
            .await?)
    }

    /// Accepts every pending request addressed to `target` on `db`.
    ///
    /// Runs when a private account switches to public.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of requests accepted
    pub(crate) async fn accept_all_pending<C: ConnectionTrait>(
        db: &C,
        target: &User,
    ) -> Result<u64, DbErr> {
        let pending = FollowRequestRepository::new(db)
            .pending_for_target(target.id)
            .await?;

        let mut accepted = 0;
        for request in &pending {
            if accept_request(db, request, target).await? {
                accepted += 1;
            }
        }

        Ok(accepted)
    }

    async fn find_request(&self, request_id: i32) -> Result<FollowRequest, AppError> {
        FollowRequestRepository::new(self.db)
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Follow request not found".to_string()))
    }

    async fn close(
        &self,
        request: FollowRequest,
        status: FollowRequestStatus,
    ) -> Result<FollowRequest, AppError> {
        ensure_pending(&request, status)?;

        let updated = FollowRequestRepository::new(self.db)
            .set_status(request.id, status)
            .await?;
        if !updated {
            return Err(not_pending());
        }

        self.find_request(request.id).await
    }

    async fn ensure_visible(&self, viewer: &User, user_id: i32) -> Result<(), AppError> {
        let owner = UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !can_view(self.db, viewer.id, &owner).await? {
            return Err(AppError::Forbidden("This account is private".to_string()));
        }

        Ok(())
    }

    async fn with_users<F>(
        &self,
        requests: Paginated<FollowRequest>,
        user_id: F,
    ) -> Result<Paginated<(FollowRequest, User)>, AppError>
    where
        F: Fn(&FollowRequest) -> i32,
    {
        let users = users_by_id(self.db, requests.items.iter().map(&user_id)).await?;

        let items = requests
            .items
            .iter()
            .filter_map(|request| {
                users
                    .get(&user_id(request))
                    .map(|user| (request.clone(), user.clone()))
            })
            .collect();

        Ok(requests.with_items(items))
    }
}

fn ensure_pending(request: &FollowRequest, next: FollowRequestStatus) -> Result<(), AppError> {
    if request.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(not_pending())
    }
}

fn not_pending() -> AppError {
    AppError::Conflict("Follow request is no longer pending".to_string())
}
