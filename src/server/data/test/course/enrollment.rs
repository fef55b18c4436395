use super::*;

/// Tests enrolling and dropping a course.
///
/// Expected: Ok with `exists` tracking each change
#[tokio::test]
async fn enrolls_and_drops() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = factory::create_course(db, org.id, owner.id).await?;
    let student = factory::helpers::create_user_with_role(db, org.id, "member").await?;

    let repo = EnrollmentRepository::new(db);
    repo.create(course.id, student.id).await?;

    assert!(repo.exists(course.id, student.id).await?);
    assert!(repo.create(course.id, student.id).await.is_err());

    assert!(repo.delete(course.id, student.id).await?);
    assert!(!repo.delete(course.id, student.id).await?);
    assert!(!repo.exists(course.id, student.id).await?);

    Ok(())
}

/// Tests listing students of a course and courses of a student.
///
/// Verifies that deleted students and deleted courses drop out.
///
/// Expected: Ok with one student and one course
#[tokio::test]
async fn lists_both_sides_of_enrollment() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = factory::create_course(db, org.id, owner.id).await?;
    let gone = CourseFactory::new(db, org.id, owner.id)
        .deleted(true)
        .build()
        .await?;
    let student = factory::user::create_user(db).await?;
    let ghost = factory::user::UserFactory::new(db)
        .deleted(true)
        .build()
        .await?;

    factory::course::create_enrollment(db, course.id, student.id).await?;
    factory::course::create_enrollment(db, course.id, ghost.id).await?;
    factory::course::create_enrollment(db, gone.id, student.id).await?;

    let repo = EnrollmentRepository::new(db);
    let page = PageRequest::new(0, 10);

    let students = repo.list_for_course(course.id, page).await?;
    assert_eq!(students.total, 1);
    assert_eq!(students.items[0].user.id, student.id);

    let courses = repo.courses_for_user(student.id, page).await?;
    assert_eq!(courses.total, 1);
    assert_eq!(courses.items[0].id, course.id);

    Ok(())
}
