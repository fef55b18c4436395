use super::*;

/// Tests searching by name or username, ignoring case and deleted users.
///
/// Expected: Ok with the two active matches only
#[tokio::test]
async fn matches_name_and_username() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .name("Ada Lovelace")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .username("lovelace_fan")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .name("Lovelace Ghost")
        .deleted(true)
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .name("Grace Hopper")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let page = repo.search("LOVELACE", PageRequest::new(0, 10)).await?;

    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);

    Ok(())
}
