use super::*;

/// Tests admin detection on an empty database.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_without_admins() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::create_user(db).await?;

    let repo = UserRepository::new(db);
    assert!(!repo.admin_exists().await?);

    Ok(())
}

/// Tests admin detection after granting admin.
///
/// Expected: Ok(true) once `set_admin` has run
#[tokio::test]
async fn returns_true_after_set_admin() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;

    let repo = UserRepository::new(db);
    repo.set_admin(user.id, true).await?;

    assert!(repo.admin_exists().await?);

    Ok(())
}

/// Tests that deleted admins do not count.
///
/// Expected: Ok(false)
#[tokio::test]
async fn ignores_deleted_admins() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .admin(true)
        .deleted(true)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    assert!(!repo.admin_exists().await?);

    Ok(())
}
