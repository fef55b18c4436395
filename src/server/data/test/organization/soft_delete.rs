use super::*;

/// Tests that soft-deleted organizations disappear from reads but keep their slug.
///
/// Expected: Ok(true) once, then lookups and lists no longer return the organization
#[tokio::test]
async fn hides_deleted_organization() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;

    let repo = OrganizationRepository::new(db);

    assert!(repo.soft_delete(org.id).await?);
    assert!(!repo.soft_delete(org.id).await?);
    assert!(repo.find_by_id(org.id).await?.is_none());
    assert!(repo.find_by_slug(&org.slug).await?.is_none());
    assert_eq!(repo.list(PageRequest::default()).await?.total, 0);
    assert!(repo.list_for_user(owner.id).await?.is_empty());
    assert!(repo.slug_exists(&org.slug).await?);

    Ok(())
}
