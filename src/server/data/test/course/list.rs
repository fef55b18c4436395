use super::*;

/// Tests listing an organization's courses.
///
/// Verifies that deleted courses are excluded and `published_only` narrows the list.
///
/// Expected: Ok with two visible courses, one of them published
#[tokio::test]
async fn lists_visible_courses() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    factory::create_course(db, org.id, owner.id).await?;
    CourseFactory::new(db, org.id, owner.id)
        .status("published")
        .build()
        .await?;
    CourseFactory::new(db, org.id, owner.id)
        .status("published")
        .deleted(true)
        .build()
        .await?;

    let repo = CourseRepository::new(db);
    let page = PageRequest::new(0, 10);

    assert_eq!(repo.list_for_organization(org.id, false, page).await?.total, 2);
    let published = repo.list_for_organization(org.id, true, page).await?;
    assert_eq!(published.total, 1);
    assert_eq!(published.items[0].status, CourseStatus::Published);

    Ok(())
}
