use super::*;
use crate::server::{
    model::{audit::RestorableEntity, CursorRequest},
    service::{audit::AuditService, post::PostService},
};

/// Tests restoring a deleted post.
///
/// Expected: Forbidden for non-admins, the post is visible again after an admin restore,
/// and both the delete and the restore are in the log
#[tokio::test]
async fn restores_deleted_post() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = User::from_entity(factory::user::create_user(db).await?);
    let admin = User::from_entity(factory::user::create_admin(db).await?);
    let post = factory::create_post(db, author.id).await?;

    PostService::new(db).delete(&author, post.id).await?;

    let service = AuditService::new(db);
    let denied = service
        .restore(&author, RestorableEntity::Post, post.id)
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    service.restore(&admin, RestorableEntity::Post, post.id).await?;

    let feed = PostService::new(db)
        .by_author(
            &author,
            author.id,
            CursorRequest {
                before: None,
                limit: 10,
            },
        )
        .await?;
    assert_eq!(feed.items.len(), 1);

    let log = service.list(&admin, Some("post"), PageRequest::default()).await?;
    let actions: Vec<&str> = log.items.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["post.restored", "post.deleted"]);

    Ok(())
}

/// Tests restoring something that was never deleted.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn restore_requires_deleted_row() -> Result<(), AppError> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let admin = User::from_entity(factory::user::create_admin(db).await?);
    let course = factory::create_course(db, org.id, owner.id).await?;

    let result = AuditService::new(db)
        .restore(&admin, RestorableEntity::Course, course.id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests that the log is for platform admins only.
///
/// Expected: Err(AppError::Forbidden)
#[tokio::test]
async fn log_is_admin_only() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = User::from_entity(factory::user::create_user(db).await?);

    let result = AuditService::new(db)
        .list(&user, None, PageRequest::default())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));

    Ok(())
}
