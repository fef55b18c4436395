use super::*;

/// Tests creating, editing and listing projects by status.
///
/// Expected: Ok with the filter matching the stored status
#[tokio::test]
async fn creates_updates_and_filters() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_research_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    factory::research::create_research(db, owner.id, "completed").await?;

    let repo = ResearchRepository::new(db);
    let project = repo
        .create(
            owner.id,
            ResearchParam {
                organization_id: None,
                title: "Soil microbes".to_string(),
                summary: "Field sampling".to_string(),
                field: Some("Biology".to_string()),
                status: ResearchStatus::Recruiting,
            },
        )
        .await?;

    let updated = repo
        .update(
            project.id,
            ResearchParam {
                organization_id: None,
                title: "Soil microbes".to_string(),
                summary: "Field and lab sampling".to_string(),
                field: Some("Biology".to_string()),
                status: ResearchStatus::Active,
            },
        )
        .await?;
    assert_eq!(updated.status, ResearchStatus::Active);

    let page = PageRequest::new(0, 10);
    assert_eq!(repo.list(None, page).await?.total, 2);
    assert_eq!(repo.list(Some(ResearchStatus::Active), page).await?.total, 1);
    assert_eq!(repo.list(Some(ResearchStatus::Recruiting), page).await?.total, 0);

    assert!(repo.soft_delete(project.id).await?);
    assert!(repo.find_by_id(project.id).await?.is_none());
    assert_eq!(repo.list(None, page).await?.total, 1);

    Ok(())
}
