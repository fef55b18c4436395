use super::*;

/// Tests that admins are preferred over owners.
///
/// Expected: Ok(Some(admin)) even though the owner joined first
#[tokio::test]
async fn prefers_admin_over_owner() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;
    let admin = factory::helpers::create_user_with_role(db, org.id, "admin").await?;
    let instructor = factory::helpers::create_user_with_role(db, org.id, "instructor").await?;

    let repo = MemberRepository::new(db);

    assert_eq!(repo.first_reviewer(org.id, instructor.id).await?, Some(admin.id));

    Ok(())
}

/// Tests ordering among admins and exclusion of the submitter.
///
/// Expected: Ok(Some(earliest other admin))
#[tokio::test]
async fn picks_earliest_admin_other_than_submitter() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;
    let now = Utc::now();
    let first = factory::user::create_user(db).await?;
    let second = factory::user::create_user(db).await?;
    let third = factory::user::create_user(db).await?;
    factory::organization::create_member_joined_at(
        db,
        org.id,
        second.id,
        "admin",
        now - Duration::days(1),
    )
    .await?;
    factory::organization::create_member_joined_at(
        db,
        org.id,
        first.id,
        "admin",
        now - Duration::days(2),
    )
    .await?;
    factory::organization::create_member_joined_at(db, org.id, third.id, "admin", now).await?;

    let repo = MemberRepository::new(db);

    assert_eq!(repo.first_reviewer(org.id, third.id).await?, Some(first.id));
    assert_eq!(repo.first_reviewer(org.id, first.id).await?, Some(second.id));

    Ok(())
}

/// Tests falling back to the owner and finding nobody.
///
/// Expected: Ok(Some(owner)) for another submitter, Ok(None) when the owner submits
#[tokio::test]
async fn falls_back_to_owner_then_none() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let instructor = factory::helpers::create_user_with_role(db, org.id, "instructor").await?;

    let repo = MemberRepository::new(db);

    assert_eq!(repo.first_reviewer(org.id, instructor.id).await?, Some(owner.id));
    assert_eq!(repo.first_reviewer(org.id, owner.id).await?, None);

    Ok(())
}
