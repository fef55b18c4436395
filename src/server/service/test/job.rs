use super::*;
use crate::server::{
    model::job::{ApplicationStatus, ApplyParam, EmploymentType, JobParam, JobStatus},
    service::job::JobService,
};

fn no_letter() -> ApplyParam {
    ApplyParam {
        cover_letter: None,
        resume_url: None,
    }
}

/// Tests posting a job for an organization.
///
/// Expected: Forbidden for a member, Ok for an admin
#[tokio::test]
async fn org_job_needs_manager() -> Result<(), AppError> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;
    let member = User::from_entity(
        factory::helpers::create_user_with_role(db, org.id, "member").await?,
    );
    let admin = User::from_entity(
        factory::helpers::create_user_with_role(db, org.id, "admin").await?,
    );

    let param = JobParam {
        organization_id: Some(org.id),
        title: " Research Assistant ".to_string(),
        description: "Help with lab work".to_string(),
        location: Some("  ".to_string()),
        employment_type: EmploymentType::PartTime,
        closes_at: Some(Utc::now() + Duration::days(30)),
    };

    let service = JobService::new(db);

    let denied = service.create(&member, param.clone()).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let job = service.create(&admin, param).await?;
    assert_eq!(job.title, "Research Assistant");
    assert_eq!(job.location, None);
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(job.organization_id, Some(org.id));

    Ok(())
}

/// Tests the guards on applying.
///
/// Expected: BadRequest for the poster, Conflict for closed jobs and duplicates
#[tokio::test]
async fn apply_guards() -> Result<(), AppError> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = User::from_entity(factory::user::create_user(db).await?);
    let applicant = User::from_entity(factory::user::create_user(db).await?);
    let open = factory::job::create_job(db, poster.id).await?;
    let closed = factory::job::JobFactory::new(db, poster.id)
        .status("closed")
        .build()
        .await?;
    let lapsed = factory::job::JobFactory::new(db, poster.id)
        .closes_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;

    let service = JobService::new(db);

    let own = service.apply(&poster, open.id, no_letter()).await;
    assert!(matches!(own, Err(AppError::BadRequest(_))));

    let to_closed = service.apply(&applicant, closed.id, no_letter()).await;
    assert!(matches!(to_closed, Err(AppError::Conflict(_))));

    let to_lapsed = service.apply(&applicant, lapsed.id, no_letter()).await;
    assert!(matches!(to_lapsed, Err(AppError::Conflict(_))));

    let application = service.apply(&applicant, open.id, no_letter()).await?;
    assert_eq!(application.status, ApplicationStatus::Submitted);
    assert_eq!(
        notification_kinds(db, poster.id).await?,
        vec![NotificationKind::ApplicationReceived]
    );

    let again = service.apply(&applicant, open.id, no_letter()).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests withdrawing and applying again.
///
/// Expected: withdrawn application frees the slot for a new one
#[tokio::test]
async fn withdraw_allows_reapply() -> Result<(), AppError> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = factory::user::create_user(db).await?;
    let applicant = User::from_entity(factory::user::create_user(db).await?);
    let job = factory::job::create_job(db, poster.id).await?;
    let application =
        factory::job::create_application(db, job.id, applicant.id, "reviewing").await?;

    let service = JobService::new(db);
    let withdrawn = service.withdraw(&applicant, application.id).await?;
    assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);

    let twice = service.withdraw(&applicant, application.id).await;
    assert!(matches!(twice, Err(AppError::Conflict(_))));

    service.apply(&applicant, job.id, no_letter()).await?;

    Ok(())
}

/// Tests moving an application through review.
///
/// Expected: submitted cannot jump to accepted; the legal path notifies the applicant
#[tokio::test]
async fn review_follows_lifecycle() -> Result<(), AppError> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = User::from_entity(factory::user::create_user(db).await?);
    let applicant = factory::user::create_user(db).await?;
    let stranger = User::from_entity(factory::user::create_user(db).await?);
    let job = factory::job::create_job(db, poster.id).await?;
    let application =
        factory::job::create_application(db, job.id, applicant.id, "submitted").await?;

    let service = JobService::new(db);

    let foreign = service
        .update_status(&stranger, application.id, ApplicationStatus::Reviewing)
        .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    let jump = service
        .update_status(&poster, application.id, ApplicationStatus::Accepted)
        .await;
    assert!(matches!(jump, Err(AppError::Conflict(_))));

    service
        .update_status(&poster, application.id, ApplicationStatus::Reviewing)
        .await?;
    let accepted = service
        .update_status(&poster, application.id, ApplicationStatus::Accepted)
        .await?;
    assert_eq!(accepted.status, ApplicationStatus::Accepted);

    assert_eq!(
        notification_kinds(db, applicant.id).await?,
        vec![
            NotificationKind::ApplicationStatusChanged,
            NotificationKind::ApplicationStatusChanged,
        ]
    );

    Ok(())
}

/// Tests closing a job twice.
///
/// Expected: closed after the first call, Conflict after the second
#[tokio::test]
async fn close_is_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = User::from_entity(factory::user::create_user(db).await?);
    let job = factory::job::create_job(db, poster.id).await?;

    let service = JobService::new(db);
    let closed = service.close(&poster, job.id).await?;
    assert_eq!(closed.status, JobStatus::Closed);

    let again = service.close(&poster, job.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}
