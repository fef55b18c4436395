use super::*;

/// Tests that soft-deleted users are invisible.
///
/// Expected: Ok(None) for the deleted user, Ok(Some) for the active one
#[tokio::test]
async fn hides_deleted_users() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let active = factory::user::create_user(db).await?;
    let deleted = factory::user::UserFactory::new(db)
        .deleted(true)
        .build()
        .await?;

    let repo = UserRepository::new(db);

    assert!(repo.find_by_id(active.id).await?.is_some());
    assert!(repo.find_by_id(deleted.id).await?.is_none());
    assert_eq!(repo.find_many(&[active.id, deleted.id]).await?.len(), 1);

    Ok(())
}

/// Tests looking up a user by email regardless of case.
///
/// Expected: Ok(Some) with the matching user
#[tokio::test]
async fn finds_by_email_case_insensitively() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .email("Ada@Uni.Example")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let found = repo.find_by_email(" ada@uni.example ").await?;

    assert_eq!(found.map(|u| u.id), Some(user.id));

    Ok(())
}
