//! Research projects and their collaborators.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::{active_user_ids, fetch_page, users_by_id},
    model::{
        research::{Collaborator, CollaboratorStatus, Research, ResearchParam, ResearchStatus},
        PageRequest, Paginated,
    },
    util::parse::{parse_stored, StoredEnum},
};

pub struct ResearchRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ResearchRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, owner_id: i32, param: ResearchParam) -> Result<Research, DbErr> {
        let now = Utc::now();

        let entity = entity::research::ActiveModel {
            owner_id: ActiveValue::Set(owner_id),
            organization_id: ActiveValue::Set(param.organization_id),
            title: ActiveValue::Set(param.title),
            summary: ActiveValue::Set(param.summary),
            field: ActiveValue::Set(param.field),
            status: ActiveValue::Set(param.status.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Research::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Research>, DbErr> {
        entity::prelude::Research::find_by_id(id)
            .filter(entity::research::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .map(Research::from_entity)
            .transpose()
    }

    pub async fn update(&self, id: i32, param: ResearchParam) -> Result<Research, DbErr> {
        let entity = entity::prelude::Research::find_by_id(id)
            .filter(entity::research::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("research {}", id)))?;

        let mut active: entity::research::ActiveModel = entity.into();
        active.organization_id = ActiveValue::Set(param.organization_id);
        active.title = ActiveValue::Set(param.title);
        active.summary = ActiveValue::Set(param.summary);
        active.field = ActiveValue::Set(param.field);
        active.status = ActiveValue::Set(param.status.as_str().to_string());
        active.updated_at = ActiveValue::Set(Utc::now());

        Research::from_entity(active.update(self.db).await?)
    }

    /// Projects newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<ResearchStatus>,
        page: PageRequest,
    ) -> Result<Paginated<Research>, DbErr> {
        let mut select =
            entity::prelude::Research::find().filter(entity::research::Column::DeletedAt.is_null());

        if let Some(status) = status {
            select = select.filter(entity::research::Column::Status.eq(status.as_str()));
        }

        let select = select
            .order_by_desc(entity::research::Column::CreatedAt)
            .order_by_desc(entity::research::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(Research::from_entity)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Research::update_many()
            .col_expr(entity::research::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::research::Column::Id.eq(id))
            .filter(entity::research::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Status of `user_id`'s collaboration on a project, if they ever asked to join.
    pub async fn collaborator_status(
        &self,
        research_id: i32,
        user_id: i32,
    ) -> Result<Option<CollaboratorStatus>, DbErr> {
        entity::prelude::ResearchCollaborator::find_by_id((research_id, user_id))
            .one(self.db)
            .await?
            .map(|row| parse_stored(&row.status))
            .transpose()
    }

    /// Records a pending collaboration request.
    pub async fn request_collaboration(
        &self,
        research_id: i32,
        user_id: i32,
        message: Option<String>,
    ) -> Result<(), DbErr> {
        entity::research_collaborator::ActiveModel {
            research_id: ActiveValue::Set(research_id),
            user_id: ActiveValue::Set(user_id),
            status: ActiveValue::Set(CollaboratorStatus::Pending.as_str().to_string()),
            message: ActiveValue::Set(message),
            created_at: ActiveValue::Set(Utc::now()),
            responded_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Accepts or rejects a pending request. Returns false when it was not pending.
    pub async fn respond(
        &self,
        research_id: i32,
        user_id: i32,
        status: CollaboratorStatus,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::ResearchCollaborator::update_many()
            .col_expr(
                entity::research_collaborator::Column::Status,
                Expr::value(status.as_str()),
            )
            .col_expr(
                entity::research_collaborator::Column::RespondedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::research_collaborator::Column::ResearchId.eq(research_id))
            .filter(entity::research_collaborator::Column::UserId.eq(user_id))
            .filter(
                entity::research_collaborator::Column::Status
                    .eq(CollaboratorStatus::Pending.as_str()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove_collaborator(&self, research_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result =
            entity::prelude::ResearchCollaborator::delete_by_id((research_id, user_id))
                .exec(self.db)
                .await?;

        Ok(result.rows_affected > 0)
    }

    /// Collaborators of a project in request order, optionally filtered by status.
    pub async fn collaborators(
        &self,
        research_id: i32,
        status: Option<CollaboratorStatus>,
    ) -> Result<Vec<Collaborator>, DbErr> {
        let mut select = entity::prelude::ResearchCollaborator::find()
            .filter(entity::research_collaborator::Column::ResearchId.eq(research_id))
            .filter(entity::research_collaborator::Column::UserId.in_subquery(active_user_ids()));

        if let Some(status) = status {
            select =
                select.filter(entity::research_collaborator::Column::Status.eq(status.as_str()));
        }

        let rows = select
            .order_by_asc(entity::research_collaborator::Column::CreatedAt)
            .all(self.db)
            .await?;

        let mut users = users_by_id(self.db, rows.iter().map(|row| row.user_id)).await?;

        rows.into_iter()
            .filter_map(|row| {
                users
                    .remove(&row.user_id)
                    .map(|user| Collaborator::from_entity(row, user))
            })
            .collect()
    }
}
