use super::*;

/// Tests soft deleting and restoring a course.
///
/// Expected: Ok with the course hidden after delete and visible again after restore
#[tokio::test]
async fn deletes_and_restores() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = factory::create_course(db, org.id, owner.id).await?;

    let repo = CourseRepository::new(db);

    assert!(!repo.restore(course.id).await?);
    assert!(repo.soft_delete(course.id).await?);
    assert!(repo.find_by_id(course.id).await?.is_none());
    assert!(!repo
        .transition(course.id, &[CourseStatus::Draft], CourseStatus::Published)
        .await?);

    assert!(repo.restore(course.id).await?);
    assert!(repo.find_by_id(course.id).await?.is_some());

    Ok(())
}

/// Tests updating a deleted course.
///
/// Expected: Err(DbErr::RecordNotFound)
#[tokio::test]
async fn update_fails_for_deleted_course() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = CourseFactory::new(db, org.id, owner.id)
        .deleted(true)
        .build()
        .await?;

    let repo = CourseRepository::new(db);
    let result = repo
        .update(
            course.id,
            UpdateCourseParam {
                faculty_id: None,
                title: "Gone".to_string(),
                code: "X".to_string(),
                description: None,
                credits: None,
            },
        )
        .await;

    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    Ok(())
}
