use super::*;

/// Tests completing a pending approval.
///
/// Verifies that a second decision on the same approval is refused.
///
/// Expected: Ok(true) then Ok(false), with the first decision stored
#[tokio::test]
async fn completes_pending_approval_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let instructor = factory::helpers::create_user_with_role(db, org.id, "instructor").await?;
    let course = factory::create_course(db, org.id, instructor.id).await?;

    let repo = ApprovalRepository::new(db);
    let approval = repo.create(course.id, instructor.id, owner.id).await?;
    assert_eq!(approval.status, ApprovalStatus::Pending);

    assert!(
        repo.complete(
            approval.id,
            owner.id,
            ApprovalStatus::ChangesRequested,
            Some("Add a syllabus".to_string()),
        )
        .await?
    );
    assert!(
        !repo
            .complete(approval.id, owner.id, ApprovalStatus::Approved, None)
            .await?
    );

    let stored = repo.find_by_id(approval.id).await?.unwrap();
    assert_eq!(stored.status, ApprovalStatus::ChangesRequested);
    assert_eq!(stored.feedback.as_deref(), Some("Add a syllabus"));
    assert!(stored.reviewed_at.is_some());

    Ok(())
}

/// Tests the reviewer queue.
///
/// Verifies that reviewed approvals, other reviewers' approvals and approvals of
/// deleted courses are left out.
///
/// Expected: Ok with only the live pending approval
#[tokio::test]
async fn queue_contains_only_pending_live_courses() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let admin = factory::helpers::create_user_with_role(db, org.id, "admin").await?;
    let live = factory::create_course(db, org.id, owner.id).await?;
    let reviewed = factory::create_course(db, org.id, owner.id).await?;
    let deleted = CourseFactory::new(db, org.id, owner.id)
        .deleted(true)
        .build()
        .await?;

    let pending =
        factory::course::create_approval(db, live.id, owner.id, Some(admin.id), "pending").await?;
    factory::course::create_approval(db, reviewed.id, owner.id, Some(admin.id), "approved")
        .await?;
    factory::course::create_approval(db, deleted.id, owner.id, Some(admin.id), "pending")
        .await?;
    factory::course::create_approval(db, live.id, admin.id, Some(owner.id), "pending").await?;

    let repo = ApprovalRepository::new(db);
    let queue = repo
        .queue_for_reviewer(admin.id, PageRequest::new(0, 10))
        .await?;

    assert_eq!(queue.total, 1);
    assert_eq!(queue.items[0].id, pending.id);

    Ok(())
}

/// Tests the approval history of a course.
///
/// Expected: Ok with every approval, newest first
#[tokio::test]
async fn history_is_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_course_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let course = factory::create_course(db, org.id, owner.id).await?;
    let first = factory::course::create_approval(db, course.id, owner.id, None, "rejected").await?;
    let second =
        factory::course::create_approval(db, course.id, owner.id, None, "pending").await?;

    let repo = ApprovalRepository::new(db);
    let history = repo.history(course.id).await?;

    let ids: Vec<i32> = history.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}
