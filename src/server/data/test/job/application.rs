use super::*;

/// Tests applying and finding the active application.
///
/// Verifies that a withdrawn application no longer counts as active.
///
/// Expected: Ok(Some) while submitted, Ok(None) after withdrawal
#[tokio::test]
async fn tracks_active_application() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = factory::user::create_user(db).await?;
    let applicant = factory::user::create_user(db).await?;
    let job = factory::job::create_job(db, poster.id).await?;

    let repo = ApplicationRepository::new(db);
    let application = repo
        .create(
            job.id,
            applicant.id,
            ApplyParam {
                cover_letter: Some("Hire me".to_string()),
                resume_url: None,
            },
        )
        .await?;
    assert_eq!(application.status, ApplicationStatus::Submitted);
    assert!(repo.find_active(job.id, applicant.id).await?.is_some());

    assert!(
        repo.transition(
            application.id,
            ApplicationStatus::Submitted,
            ApplicationStatus::Withdrawn,
        )
        .await?
    );
    assert!(repo.find_active(job.id, applicant.id).await?.is_none());

    Ok(())
}

/// Tests that transitions only apply from the expected status.
///
/// Expected: Ok(false) when the application is not in `from`
#[tokio::test]
async fn refuses_transition_from_wrong_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = factory::user::create_user(db).await?;
    let applicant = factory::user::create_user(db).await?;
    let job = factory::job::create_job(db, poster.id).await?;
    let application =
        factory::job::create_application(db, job.id, applicant.id, "accepted").await?;

    let repo = ApplicationRepository::new(db);

    assert!(
        !repo
            .transition(
                application.id,
                ApplicationStatus::Reviewing,
                ApplicationStatus::Rejected,
            )
            .await?
    );
    assert_eq!(
        repo.find_by_id(application.id).await?.map(|a| a.status),
        Some(ApplicationStatus::Accepted)
    );

    Ok(())
}

/// Tests listing applications from both sides.
///
/// Verifies that applications of deleted accounts are hidden from the poster.
///
/// Expected: Ok with one applicant for the job and one application for the applicant
#[tokio::test]
async fn lists_applications() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = factory::user::create_user(db).await?;
    let applicant = factory::user::create_user(db).await?;
    let ghost = factory::user::UserFactory::new(db)
        .deleted(true)
        .build()
        .await?;
    let job = factory::job::create_job(db, poster.id).await?;
    factory::job::create_application(db, job.id, applicant.id, "submitted").await?;
    factory::job::create_application(db, job.id, ghost.id, "submitted").await?;

    let repo = ApplicationRepository::new(db);
    let page = PageRequest::new(0, 10);

    let for_job = repo.list_for_job(job.id, page).await?;
    assert_eq!(for_job.items.len(), 1);
    assert_eq!(for_job.items[0].1.id, applicant.id);

    let mine = repo.list_for_applicant(applicant.id, page).await?;
    assert_eq!(mine.total, 1);
    assert_eq!(mine.items[0].job_id, job.id);

    Ok(())
}
