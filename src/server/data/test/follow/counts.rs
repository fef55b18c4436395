use super::*;

/// Tests follower and following counts.
///
/// Verifies that edges to or from deleted accounts are not counted.
///
/// Expected: Ok with 2 followers and 1 followed user
#[tokio::test]
async fn counts_only_active_users() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let ada = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;
    let cy = factory::user::create_user(db).await?;
    let ghost = factory::user::UserFactory::new(db)
        .deleted(true)
        .build()
        .await?;

    factory::create_follow(db, bob.id, ada.id).await?;
    factory::create_follow(db, cy.id, ada.id).await?;
    factory::create_follow(db, ghost.id, ada.id).await?;
    factory::create_follow(db, ada.id, bob.id).await?;
    factory::create_follow(db, ada.id, ghost.id).await?;

    let repo = FollowRepository::new(db);

    assert_eq!(repo.follower_count(ada.id).await?, 2);
    assert_eq!(repo.following_count(ada.id).await?, 1);
    assert_eq!(repo.following_ids(ada.id).await?.len(), 2);

    Ok(())
}
