use super::*;

/// Tests adding, finding, re-roling and removing a member.
///
/// Expected: Ok with each change reflected by `find`
#[tokio::test]
async fn manages_membership() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;
    let user = factory::user::create_user(db).await?;

    let repo = MemberRepository::new(db);
    repo.add(org.id, user.id, OrgRole::Member).await?;
    assert_eq!(
        repo.find(org.id, user.id).await?.map(|m| m.role),
        Some(OrgRole::Member)
    );

    assert!(repo.set_role(org.id, user.id, OrgRole::Instructor).await?);
    assert_eq!(
        repo.find(org.id, user.id).await?.map(|m| m.role),
        Some(OrgRole::Instructor)
    );

    assert!(repo.remove(org.id, user.id).await?);
    assert!(repo.find(org.id, user.id).await?.is_none());

    Ok(())
}

/// Tests listing members with their profiles and counting roles.
///
/// Verifies that deleted accounts are left out of the list.
///
/// Expected: Ok with the owner and one active member
#[tokio::test]
async fn lists_active_members() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    factory::helpers::create_user_with_role(db, org.id, "member").await?;
    let ghost = factory::user::UserFactory::new(db)
        .deleted(true)
        .build()
        .await?;
    factory::create_member(db, org.id, ghost.id, "member").await?;

    let repo = MemberRepository::new(db);
    let page = repo.list(org.id, PageRequest::new(0, 10)).await?;

    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].user.id, owner.id);
    assert_eq!(page.items[0].role, OrgRole::Owner);
    assert_eq!(repo.count_role(org.id, OrgRole::Owner).await?, 1);

    Ok(())
}

/// Tests finding a membership by the member's email.
///
/// Expected: Ok(Some) regardless of email case
#[tokio::test]
async fn finds_membership_by_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;
    let user = factory::user::UserFactory::new(db)
        .email("member@uni.example")
        .build()
        .await?;
    factory::create_member(db, org.id, user.id, "member").await?;

    let repo = MemberRepository::new(db);

    assert!(repo
        .find_by_email(org.id, "Member@Uni.Example")
        .await?
        .is_some());
    assert!(repo
        .find_by_email(org.id, "stranger@uni.example")
        .await?
        .is_none());

    Ok(())
}
