//! Audit log access and restoring soft-deleted content.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{audit::AuditRepository, course::CourseRepository, post::PostRepository},
    error::AppError,
    model::{
        audit::{entity_type, AuditEntry, RecordAuditParam, RestorableEntity},
        user::User,
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

pub struct AuditService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> AuditService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Audit entries newest first, optionally for one entity type. Platform admins only.
    pub async fn list(
        &self,
        actor: &User,
        entity_type: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<AuditEntry>, AppError> {
        ensure_admin(actor)?;

        Ok(AuditRepository::new(self.db)
            .list(entity_type, page)
            .await?)
    }

    /// Brings back a soft-deleted post or course. Platform admins only.
    ///
    /// # Returns
    /// - `Ok(())` - The row is visible again and the restore is audited
    /// - `Err(AppError::Forbidden)` - The actor is not a platform admin
    /// - `Err(AppError::NotFound)` - No deleted row of that type with that id
    pub async fn restore(
        &self,
        actor: &User,
        entity: RestorableEntity,
        entity_id: i32,
    ) -> Result<(), AppError> {
        ensure_admin(actor)?;

        let txn = self.db.begin().await?;
        let (restored, action, kind) = match entity {
            RestorableEntity::Post => (
                PostRepository::new(&txn).restore(entity_id).await?,
                "post.restored",
                entity_type::POST,
            ),
            RestorableEntity::Course => (
                CourseRepository::new(&txn).restore(entity_id).await?,
                "course.restored",
                entity_type::COURSE,
            ),
        };

        if !restored {
            return Err(AppError::NotFound(format!(
                "No deleted {} with id {}",
                entity.as_str(),
                entity_id
            )));
        }

        AuditRepository::new(&txn)
            .record(RecordAuditParam::new(actor.id, action, kind, entity_id))
            .await?;
        txn.commit().await?;

        tracing::info!("Admin {} restored {} {}", actor.id, entity.as_str(), entity_id);

        Ok(())
    }
}

fn ensure_admin(actor: &User) -> Result<(), AppError> {
    if !actor.is_admin {
        return Err(AppError::Forbidden(
            "Only platform admins can do this".to_string(),
        ));
    }

    Ok(())
}
