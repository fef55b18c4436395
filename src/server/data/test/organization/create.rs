use super::*;

/// Tests creating an organization and finding it by slug.
///
/// Expected: Ok with the organization retrievable by id and slug
#[tokio::test]
async fn creates_and_finds_by_slug() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;

    let repo = OrganizationRepository::new(db);
    let org = repo
        .create(CreateOrganizationParam {
            name: "Uni of Examples".to_string(),
            slug: "uni-examples".to_string(),
            description: None,
            website: Some("https://uni.example".to_string()),
            created_by: owner.id,
        })
        .await?;

    assert_eq!(repo.find_by_slug("uni-examples").await?.map(|o| o.id), Some(org.id));
    assert!(repo.find_by_id(org.id).await?.is_some());
    assert!(repo.slug_exists("uni-examples").await?);
    assert!(!repo.slug_exists("other").await?);

    Ok(())
}

/// Tests updating the editable fields.
///
/// Expected: Ok with the new name and description
#[tokio::test]
async fn updates_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;

    let repo = OrganizationRepository::new(db);
    let updated = repo
        .update(
            org.id,
            UpdateOrganizationParam {
                name: "Renamed".to_string(),
                description: Some("About us".to_string()),
                website: None,
            },
        )
        .await?;

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.slug, org.slug);
    assert_eq!(updated.description.as_deref(), Some("About us"));

    Ok(())
}
