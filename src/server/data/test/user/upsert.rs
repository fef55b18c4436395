use super::*;

/// Tests creating a new user on first login.
///
/// Verifies that the username is derived from the email's local part and that the
/// user starts public and without admin rights.
///
/// Expected: Ok with username `ada_lovelace`
#[tokio::test]
async fn creates_new_user_with_username_from_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo
        .upsert(UpsertUserParam {
            auth_subject: "subject-ada".to_string(),
            email: "ada.lovelace@uni.example".to_string(),
            name: "Ada Lovelace".to_string(),
            is_admin: None,
        })
        .await?;

    assert_eq!(user.username, "ada_lovelace");
    assert_eq!(user.name, "Ada Lovelace");
    assert!(!user.is_private);
    assert!(!user.is_admin);

    Ok(())
}

/// Tests username clash handling.
///
/// Verifies that when the derived username already belongs to someone else, the new
/// user receives the derived username suffixed with their own id.
///
/// Expected: Ok with username `ada_{id}`
#[tokio::test]
async fn suffixes_username_with_id_on_clash() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .username("ada")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let user = repo
        .upsert(UpsertUserParam {
            auth_subject: "subject-ada".to_string(),
            email: "ada@other.example".to_string(),
            name: "Ada".to_string(),
            is_admin: None,
        })
        .await?;

    assert_eq!(user.username, format!("ada_{}", user.id));

    Ok(())
}

/// Tests refreshing an existing user without touching admin status.
///
/// Verifies that a second login updates name and email while `is_admin: None`
/// leaves the stored admin flag in place.
///
/// Expected: Ok with new name and admin preserved
#[tokio::test]
async fn refreshes_existing_user_and_preserves_admin() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::user::UserFactory::new(db)
        .auth_subject("subject-grace")
        .admin(true)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let user = repo
        .upsert(UpsertUserParam {
            auth_subject: "subject-grace".to_string(),
            email: "grace@navy.example".to_string(),
            name: "Grace Hopper".to_string(),
            is_admin: None,
        })
        .await?;

    assert_eq!(user.id, existing.id);
    assert_eq!(user.username, existing.username);
    assert_eq!(user.email, "grace@navy.example");
    assert_eq!(user.name, "Grace Hopper");
    assert!(user.is_admin);

    Ok(())
}

/// Tests granting admin through the bootstrap login.
///
/// Expected: Ok with admin set on the existing user
#[tokio::test]
async fn grants_admin_when_requested() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::user::create_user(db).await?;

    let repo = UserRepository::new(db);
    let user = repo
        .upsert(UpsertUserParam {
            auth_subject: existing.auth_subject.clone(),
            email: existing.email.clone(),
            name: existing.name.clone(),
            is_admin: Some(true),
        })
        .await?;

    assert!(user.is_admin);

    Ok(())
}
