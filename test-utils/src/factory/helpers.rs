//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// Used to derive unique emails, usernames, slugs and tokens across factories.
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user and an organization owned by that user.
///
/// # Returns
/// - `Ok((owner, organization))` - The owner (with an `owner` membership) and organization
/// - `Err(DbErr)` - Database error during creation
pub async fn create_organization_with_owner(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::organization::Model), DbErr> {
    let owner = crate::factory::user::create_user(db).await?;
    let org = crate::factory::organization::create_organization(db, owner.id).await?;
    crate::factory::organization::create_member(db, org.id, owner.id, "owner").await?;

    Ok((owner, org))
}

/// Creates a new user who is a member of `organization_id` with the given role.
pub async fn create_user_with_role(
    db: &DatabaseConnection,
    organization_id: i32,
    role: &str,
) -> Result<entity::user::Model, DbErr> {
    let user = crate::factory::user::create_user(db).await?;
    crate::factory::organization::create_member(db, organization_id, user.id, role).await?;

    Ok(user)
}
