//! Factories for research projects and collaborators.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a research project with the given status (`recruiting`, `active`, `completed`).
pub async fn create_research(
    db: &DatabaseConnection,
    owner_id: i32,
    status: &str,
) -> Result<entity::research::Model, DbErr> {
    let now = Utc::now();
    entity::research::ActiveModel {
        owner_id: ActiveValue::Set(owner_id),
        organization_id: ActiveValue::Set(None),
        title: ActiveValue::Set(format!("Research {}", next_id())),
        summary: ActiveValue::Set("Test research summary".to_string()),
        field: ActiveValue::Set(None),
        status: ActiveValue::Set(status.to_string()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Creates a collaborator row with the given status.
pub async fn create_collaborator(
    db: &DatabaseConnection,
    research_id: i32,
    user_id: i32,
    status: &str,
) -> Result<entity::research_collaborator::Model, DbErr> {
    entity::research_collaborator::ActiveModel {
        research_id: ActiveValue::Set(research_id),
        user_id: ActiveValue::Set(user_id),
        status: ActiveValue::Set(status.to_string()),
        message: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        responded_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}
