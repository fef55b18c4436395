use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::server::{
    data::fetch_page,
    model::{
        audit::{AuditEntry, RecordAuditParam},
        PageRequest, Paginated,
    },
};

/// Append-only access to the audit log.
///
/// Services record entries on the same connection or transaction as the change they
/// describe, so an entry exists exactly when its change was committed.
pub struct AuditRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AuditRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn record(&self, param: RecordAuditParam) -> Result<AuditEntry, DbErr> {
        let entity = entity::audit_log::ActiveModel {
            actor_id: ActiveValue::Set(param.actor_id),
            action: ActiveValue::Set(param.action.to_string()),
            entity_type: ActiveValue::Set(param.entity_type.to_string()),
            entity_id: ActiveValue::Set(param.entity_id),
            details: ActiveValue::Set(param.details),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(AuditEntry::from_entity(entity))
    }

    /// Entries newest first, optionally limited to one entity type.
    pub async fn list(
        &self,
        entity_type: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<AuditEntry>, DbErr> {
        let mut select = entity::prelude::AuditLog::find();

        if let Some(entity_type) = entity_type {
            select = select.filter(entity::audit_log::Column::EntityType.eq(entity_type));
        }

        let select = select
            .order_by_desc(entity::audit_log::Column::CreatedAt)
            .order_by_desc(entity::audit_log::Column::Id);

        Ok(fetch_page(self.db, select, page)
            .await?
            .map(AuditEntry::from_entity))
    }
}
