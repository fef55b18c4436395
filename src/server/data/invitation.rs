//! Invitation persistence.
//!
//! Rows keep their stored status until a write changes it. Reads that filter by status
//! take `now` and treat pending rows past `expires_at` as expired, matching
//! `Invitation::effective_status`.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::fetch_page,
    model::{
        invitation::{CreateInvitationParam, Invitation, InvitationDetails, InvitationStatus},
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

pub struct InvitationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InvitationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateInvitationParam) -> Result<Invitation, DbErr> {
        let entity = entity::invitation::ActiveModel {
            organization_id: ActiveValue::Set(param.organization_id),
            email: ActiveValue::Set(param.email),
            role: ActiveValue::Set(param.role.as_str().to_string()),
            token: ActiveValue::Set(param.token),
            status: ActiveValue::Set(InvitationStatus::Pending.as_str().to_string()),
            invited_by: ActiveValue::Set(param.invited_by),
            expires_at: ActiveValue::Set(param.expires_at),
            created_at: ActiveValue::Set(Utc::now()),
            responded_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Invitation::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Invitation>, DbErr> {
        entity::prelude::Invitation::find_by_id(id)
            .one(self.db)
            .await?
            .map(Invitation::from_entity)
            .transpose()
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, DbErr> {
        entity::prelude::Invitation::find()
            .filter(entity::invitation::Column::Token.eq(token))
            .one(self.db)
            .await?
            .map(Invitation::from_entity)
            .transpose()
    }

    /// Finds an invitation by token together with its organization's name.
    ///
    /// Invitations to deleted organizations are not found.
    pub async fn find_details_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InvitationDetails>, DbErr> {
        let row = entity::prelude::Invitation::find()
            .filter(entity::invitation::Column::Token.eq(token))
            .find_also_related(entity::prelude::Organization)
            .filter(entity::organization::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        match row {
            Some((invitation, Some(organization))) => Ok(Some(InvitationDetails {
                invitation: Invitation::from_entity(invitation)?,
                organization_name: organization.name,
            })),
            _ => Ok(None),
        }
    }

    /// Finds a pending, unexpired invitation of `email` to `organization_id`.
    pub async fn find_open(
        &self,
        organization_id: i32,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invitation>, DbErr> {
        entity::prelude::Invitation::find()
            .filter(entity::invitation::Column::OrganizationId.eq(organization_id))
            .filter(entity::invitation::Column::Email.eq(email))
            .filter(open_condition(now))
            .one(self.db)
            .await?
            .map(Invitation::from_entity)
            .transpose()
    }

    /// Invitations of an organization, newest first, optionally filtered by effective status.
    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        status: Option<InvitationStatus>,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Paginated<Invitation>, DbErr> {
        let mut select = entity::prelude::Invitation::find()
            .filter(entity::invitation::Column::OrganizationId.eq(organization_id));

        if let Some(status) = status {
            select = select.filter(effective_status_condition(status, now));
        }

        let select = select
            .order_by_desc(entity::invitation::Column::CreatedAt)
            .order_by_desc(entity::invitation::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(Invitation::from_entity)
    }

    /// Pending, unexpired invitations addressed to `email`, newest first.
    pub async fn list_open_for_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvitationDetails>, DbErr> {
        let rows = entity::prelude::Invitation::find()
            .filter(entity::invitation::Column::Email.eq(email))
            .filter(open_condition(now))
            .find_also_related(entity::prelude::Organization)
            .filter(entity::organization::Column::DeletedAt.is_null())
            .order_by_desc(entity::invitation::Column::CreatedAt)
            .all(self.db)
            .await?;

        rows.into_iter()
            .filter_map(|(invitation, organization)| {
                organization.map(|organization| {
                    Ok(InvitationDetails {
                        invitation: Invitation::from_entity(invitation)?,
                        organization_name: organization.name,
                    })
                })
            })
            .collect()
    }

    /// Moves an invitation from `from` to `to`, stamping `responded_at`.
    ///
    /// # Returns
    /// - `Ok(true)` - The row was in `from` and now holds `to`
    /// - `Ok(false)` - The row is missing or was no longer in `from`
    pub async fn transition(
        &self,
        id: i32,
        from: InvitationStatus,
        to: InvitationStatus,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Invitation::update_many()
            .col_expr(entity::invitation::Column::Status, Expr::value(to.as_str()))
            .col_expr(
                entity::invitation::Column::RespondedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::invitation::Column::Id.eq(id))
            .filter(entity::invitation::Column::Status.eq(from.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Re-issues an invitation with a fresh token and expiry, back in pending.
    pub async fn reissue(
        &self,
        id: i32,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<Invitation, DbErr> {
        let entity = entity::prelude::Invitation::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("invitation {}", id)))?;

        let mut active: entity::invitation::ActiveModel = entity.into();
        active.token = ActiveValue::Set(token);
        active.expires_at = ActiveValue::Set(expires_at);
        active.status = ActiveValue::Set(InvitationStatus::Pending.as_str().to_string());
        active.responded_at = ActiveValue::Set(None);

        Invitation::from_entity(active.update(self.db).await?)
    }

    /// Flips every pending invitation with `expires_at <= now` to expired.
    ///
    /// Rows in any other state are left alone. Returns the number of rows changed.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::Invitation::update_many()
            .col_expr(
                entity::invitation::Column::Status,
                Expr::value(InvitationStatus::Expired.as_str()),
            )
            .filter(
                entity::invitation::Column::Status.eq(InvitationStatus::Pending.as_str()),
            )
            .filter(entity::invitation::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

fn open_condition(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(entity::invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
        .add(entity::invitation::Column::ExpiresAt.gt(now))
}

fn effective_status_condition(status: InvitationStatus, now: DateTime<Utc>) -> Condition {
    match status {
        InvitationStatus::Pending => open_condition(now),
        InvitationStatus::Expired => Condition::any()
            .add(entity::invitation::Column::Status.eq(InvitationStatus::Expired.as_str()))
            .add(
                Condition::all()
                    .add(
                        entity::invitation::Column::Status
                            .eq(InvitationStatus::Pending.as_str()),
                    )
                    .add(entity::invitation::Column::ExpiresAt.lte(now)),
            ),
        other => Condition::all().add(entity::invitation::Column::Status.eq(other.as_str())),
    }
}
