use super::*;

/// Tests listing and counting comments.
///
/// Verifies that deleted comments are excluded from both.
///
/// Expected: Ok with the live comments oldest first and per-post counts
#[tokio::test]
async fn lists_and_counts_live_comments() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let post = factory::create_post(db, author.id).await?;
    let quiet = factory::create_post(db, author.id).await?;

    let repo = CommentRepository::new(db);
    let first = repo.create(post.id, author.id, "First".to_string()).await?;
    let second = repo.create(post.id, author.id, "Second".to_string()).await?;
    let removed = factory::post::create_comment(db, post.id, author.id).await?;
    assert!(repo.soft_delete(removed.id).await?);

    let page = repo.list_for_post(post.id, PageRequest::new(0, 10)).await?;
    let ids: Vec<i32> = page.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let counts = repo.count_for_posts(&[post.id, quiet.id]).await?;
    assert_eq!(counts.get(&post.id), Some(&2));
    assert_eq!(counts.get(&quiet.id), None);

    assert!(repo.find_by_id(removed.id).await?.is_none());

    Ok(())
}
