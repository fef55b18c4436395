use super::*;

/// Tests recording entries and listing them by entity type.
///
/// Expected: Ok with entries newest first and the filter narrowing by type
#[tokio::test]
async fn records_and_filters_entries() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let actor = factory::user::create_user(db).await?;

    let repo = AuditRepository::new(db);
    repo.record(RecordAuditParam::new(
        actor.id,
        "post.deleted",
        entity_type::POST,
        7,
    ))
    .await?;
    let latest = repo
        .record(
            RecordAuditParam::new(actor.id, "course.restored", entity_type::COURSE, 3)
                .details(serde_json::json!({ "reason": "mistake" })),
        )
        .await?;

    assert_eq!(latest.details, Some(serde_json::json!({ "reason": "mistake" })));

    let page = PageRequest::new(0, 10);
    let all = repo.list(None, page).await?;
    assert_eq!(all.total, 2);
    assert_eq!(all.items[0].id, latest.id);

    let posts = repo.list(Some(entity_type::POST), page).await?;
    assert_eq!(posts.total, 1);
    assert_eq!(posts.items[0].action, "post.deleted");
    assert_eq!(posts.items[0].actor_id, Some(actor.id));

    Ok(())
}
