use super::*;

/// Tests creating a course.
///
/// Expected: Ok with the course in draft
#[tokio::test]
async fn creates_draft_course() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;

    let repo = CourseRepository::new(db);
    let course = repo
        .create(CreateCourseParam {
            organization_id: org.id,
            faculty_id: None,
            created_by: owner.id,
            title: "Compilers".to_string(),
            code: "CS-401".to_string(),
            description: None,
            credits: Some(6),
        })
        .await?;

    assert_eq!(course.status, CourseStatus::Draft);
    assert_eq!(repo.find_by_id(course.id).await?.map(|c| c.code), Some(course.code));

    Ok(())
}

/// Tests editing a course and moving its status.
///
/// Expected: Ok with the new fields, then Ok(true) for the status change
#[tokio::test]
async fn updates_fields_and_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = factory::create_course(db, org.id, owner.id).await?;

    let repo = CourseRepository::new(db);
    let updated = repo
        .update(
            course.id,
            UpdateCourseParam {
                faculty_id: None,
                title: "Advanced Compilers".to_string(),
                code: "CS-501".to_string(),
                description: Some("Optimizations".to_string()),
                credits: None,
            },
        )
        .await?;

    assert_eq!(updated.title, "Advanced Compilers");
    assert_eq!(updated.credits, None);

    assert!(repo
        .transition(course.id, CourseStatus::SUBMITTABLE, CourseStatus::UnderReview)
        .await?);
    assert_eq!(
        repo.find_by_id(course.id).await?.map(|c| c.status),
        Some(CourseStatus::UnderReview)
    );
    assert!(!repo
        .transition(999, &[CourseStatus::UnderReview], CourseStatus::Published)
        .await?);

    Ok(())
}

/// Tests that a status change only applies from the expected states.
///
/// Expected: Ok(false) and the stored status unchanged for a published course
#[tokio::test]
async fn transition_requires_expected_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = CourseFactory::new(db, org.id, owner.id)
        .status("published")
        .build()
        .await?;

    let repo = CourseRepository::new(db);
    assert!(!repo
        .transition(course.id, &[CourseStatus::UnderReview], CourseStatus::Rejected)
        .await?);
    assert!(!repo
        .transition(course.id, CourseStatus::SUBMITTABLE, CourseStatus::UnderReview)
        .await?);
    assert_eq!(
        repo.find_by_id(course.id).await?.map(|c| c.status),
        Some(CourseStatus::Published)
    );

    Ok(())
}
