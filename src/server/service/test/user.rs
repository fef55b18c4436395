use super::*;
use crate::server::{
    model::user::{Relationship, UpdateProfileParam},
    service::user::UserService,
};

/// Tests the profile counters and relationship.
///
/// Expected: counts for a private user are visible and the relationship is pending
#[tokio::test]
async fn profile_shows_counts_and_relationship() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let viewer = factory::user::create_user(db).await?;
    let follower = factory::user::create_user(db).await?;
    let owner = factory::user::create_private_user(db).await?;
    factory::create_follow(db, follower.id, owner.id).await?;
    factory::create_follow_request(db, viewer.id, owner.id, "pending").await?;
    factory::create_post(db, owner.id).await?;
    factory::post::PostFactory::new(db, owner.id)
        .deleted(true)
        .build()
        .await?;

    let profile = UserService::new(db).get_profile(viewer.id, owner.id).await?;

    assert_eq!(profile.user.id, owner.id);
    assert_eq!(profile.follower_count, 1);
    assert_eq!(profile.following_count, 0);
    assert_eq!(profile.post_count, 1);
    assert_eq!(profile.relationship, Relationship::Pending);

    Ok(())
}

/// Tests that deleted accounts read as missing.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn deleted_user_is_not_found() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let gone = factory::user::UserFactory::new(db).deleted(true).build().await?;

    let result = UserService::new(db).get_user(gone.id).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests taking a username that belongs to someone else.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn username_must_be_unique() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db).username("ada").build().await?;
    let actor = User::from_entity(factory::user::create_user(db).await?);

    let result = UserService::new(db)
        .update_profile(
            &actor,
            UpdateProfileParam {
                name: actor.name.clone(),
                username: "ADA".to_string(),
                headline: None,
                bio: None,
                avatar_url: None,
                is_private: false,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests updating one's own profile.
///
/// Expected: normalized fields are stored
#[tokio::test]
async fn updates_profile() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let actor = User::from_entity(factory::user::create_user(db).await?);

    let updated = UserService::new(db)
        .update_profile(
            &actor,
            UpdateProfileParam {
                name: " Grace Hopper ".to_string(),
                username: "Grace_H".to_string(),
                headline: Some("Rear admiral".to_string()),
                bio: Some("  ".to_string()),
                avatar_url: None,
                is_private: true,
            },
        )
        .await?;

    assert_eq!(updated.name, "Grace Hopper");
    assert_eq!(updated.username, "grace_h");
    assert_eq!(updated.headline.as_deref(), Some("Rear admiral"));
    assert_eq!(updated.bio, None);
    assert!(updated.is_private);

    Ok(())
}

/// Tests searching users.
///
/// Expected: blank query is empty, a name fragment matches case-insensitively
#[tokio::test]
async fn search_by_name_fragment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let ada = factory::user::UserFactory::new(db)
        .name("Ada Lovelace")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .name("Alan Turing")
        .build()
        .await?;

    let service = UserService::new(db);

    let blank = service.search("   ", PageRequest::default()).await?;
    assert_eq!(blank.total, 0);
    assert!(blank.items.is_empty());

    let found = service.search("LOVE", PageRequest::default()).await?;
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].id, ada.id);

    Ok(())
}
