use super::*;

/// Tests deleting an existing edge.
///
/// Expected: Ok(true) and the edge is gone
#[tokio::test]
async fn deletes_existing_edge() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;
    factory::create_follow(db, alice.id, bob.id).await?;

    let repo = FollowRepository::new(db);

    assert!(repo.delete(alice.id, bob.id).await?);
    assert!(!repo.exists(alice.id, bob.id).await?);

    Ok(())
}

/// Tests deleting an edge that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_edge() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;

    let repo = FollowRepository::new(db);

    assert!(!repo.delete(alice.id, bob.id).await?);

    Ok(())
}
