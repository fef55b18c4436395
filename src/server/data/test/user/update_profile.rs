use super::*;

fn profile(username: &str) -> UpdateProfileParam {
    UpdateProfileParam {
        name: "Ada Lovelace".to_string(),
        username: username.to_string(),
        headline: Some("Analyst".to_string()),
        bio: Some("Notes on the analytical engine".to_string()),
        avatar_url: None,
        is_private: true,
    }
}

/// Tests overwriting every editable profile field.
///
/// Expected: Ok with all fields updated
#[tokio::test]
async fn updates_profile_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;

    let repo = UserRepository::new(db);
    let updated = repo.update_profile(user.id, profile("countess")).await?;

    assert_eq!(updated.username, "countess");
    assert_eq!(updated.headline.as_deref(), Some("Analyst"));
    assert!(updated.is_private);
    assert!(repo.username_exists("countess").await?);

    Ok(())
}

/// Tests updating a user that does not exist.
///
/// Expected: Err(DbErr::RecordNotFound)
#[tokio::test]
async fn fails_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let result = repo.update_profile(999, profile("nobody")).await;

    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    Ok(())
}
