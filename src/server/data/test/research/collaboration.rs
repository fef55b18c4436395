use super::*;

/// Tests the request and response flow of a collaboration.
///
/// Verifies that a decided request cannot be answered again.
///
/// Expected: Ok(true) on the first response, Ok(false) on the second
#[tokio::test]
async fn responds_to_pending_request_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_research_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    let scholar = factory::user::create_user(db).await?;
    let project = factory::research::create_research(db, owner.id, "recruiting").await?;

    let repo = ResearchRepository::new(db);
    repo.request_collaboration(project.id, scholar.id, Some("I can help".to_string()))
        .await?;
    assert_eq!(
        repo.collaborator_status(project.id, scholar.id).await?,
        Some(CollaboratorStatus::Pending)
    );

    assert!(
        repo.respond(project.id, scholar.id, CollaboratorStatus::Accepted)
            .await?
    );
    assert!(
        !repo
            .respond(project.id, scholar.id, CollaboratorStatus::Rejected)
            .await?
    );
    assert_eq!(
        repo.collaborator_status(project.id, scholar.id).await?,
        Some(CollaboratorStatus::Accepted)
    );

    Ok(())
}

/// Tests that a second request by the same user is rejected.
///
/// Expected: Err from the composite primary key
#[tokio::test]
async fn rejects_duplicate_request() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_research_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    let scholar = factory::user::create_user(db).await?;
    let project = factory::research::create_research(db, owner.id, "recruiting").await?;
    factory::research::create_collaborator(db, project.id, scholar.id, "rejected").await?;

    let repo = ResearchRepository::new(db);
    let result = repo
        .request_collaboration(project.id, scholar.id, None)
        .await;

    assert!(result.is_err());

    Ok(())
}

/// Tests listing collaborators with and without a status filter.
///
/// Verifies that deleted accounts are hidden.
///
/// Expected: Ok with two visible rows, one of them accepted
#[tokio::test]
async fn lists_collaborators() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_research_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    let accepted = factory::user::create_user(db).await?;
    let pending = factory::user::create_user(db).await?;
    let ghost = factory::user::UserFactory::new(db)
        .deleted(true)
        .build()
        .await?;
    let project = factory::research::create_research(db, owner.id, "active").await?;
    factory::research::create_collaborator(db, project.id, accepted.id, "accepted").await?;
    factory::research::create_collaborator(db, project.id, pending.id, "pending").await?;
    factory::research::create_collaborator(db, project.id, ghost.id, "accepted").await?;

    let repo = ResearchRepository::new(db);

    assert_eq!(repo.collaborators(project.id, None).await?.len(), 2);
    let team = repo
        .collaborators(project.id, Some(CollaboratorStatus::Accepted))
        .await?;
    assert_eq!(team.len(), 1);
    assert_eq!(team[0].user.id, accepted.id);

    assert!(repo.remove_collaborator(project.id, accepted.id).await?);
    assert!(repo
        .collaborator_status(project.id, accepted.id)
        .await?
        .is_none());

    Ok(())
}
