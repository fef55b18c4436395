use super::*;

fn posting(title: &str) -> JobParam {
    JobParam {
        organization_id: None,
        title: title.to_string(),
        description: "Teach and research".to_string(),
        location: Some("Remote".to_string()),
        employment_type: EmploymentType::Contract,
        closes_at: None,
    }
}

/// Tests creating and editing a posting.
///
/// Expected: Ok with an open job carrying the edited fields
#[tokio::test]
async fn creates_and_updates_job() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = factory::user::create_user(db).await?;

    let repo = JobRepository::new(db);
    let job = repo.create(poster.id, posting("Lecturer")).await?;
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(job.employment_type, EmploymentType::Contract);

    let updated = repo.update(job.id, posting("Senior Lecturer")).await?;
    assert_eq!(updated.title, "Senior Lecturer");
    assert_eq!(updated.posted_by, poster.id);

    Ok(())
}

/// Tests listing open postings.
///
/// Verifies that closed and deleted jobs are left out and the organization filter applies.
///
/// Expected: Ok with two open jobs overall and one for the organization
#[tokio::test]
async fn lists_open_jobs() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    JobFactory::new(db, owner.id)
        .organization_id(org.id)
        .build()
        .await?;
    factory::job::create_job(db, owner.id).await?;
    JobFactory::new(db, owner.id).status("closed").build().await?;
    let deleted = factory::job::create_job(db, owner.id).await?;

    let repo = JobRepository::new(db);
    assert!(repo.soft_delete(deleted.id).await?);

    let page = PageRequest::new(0, 10);
    assert_eq!(repo.list_open(None, page).await?.total, 2);
    assert_eq!(repo.list_open(Some(org.id), page).await?.total, 1);
    assert!(repo.find_by_id(deleted.id).await?.is_none());

    Ok(())
}

/// Tests closing a posting.
///
/// Expected: Ok(true) and the job no longer listed
#[tokio::test]
async fn closes_job() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_job_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let poster = factory::user::create_user(db).await?;
    let job = factory::job::create_job(db, poster.id).await?;

    let repo = JobRepository::new(db);

    assert!(repo.set_status(job.id, JobStatus::Closed).await?);
    assert_eq!(
        repo.find_by_id(job.id).await?.map(|j| j.status),
        Some(JobStatus::Closed)
    );
    assert_eq!(repo.list_open(None, PageRequest::default()).await?.total, 0);

    Ok(())
}
