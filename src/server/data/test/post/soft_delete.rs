use super::*;

/// Tests soft deleting and restoring a post.
///
/// Expected: Ok with the post hidden from lookups and counts until restored
#[tokio::test]
async fn deletes_and_restores() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let post = factory::create_post(db, author.id).await?;

    let repo = PostRepository::new(db);

    assert!(repo.soft_delete(post.id).await?);
    assert!(!repo.soft_delete(post.id).await?);
    assert!(repo.find_by_id(post.id).await?.is_none());
    assert_eq!(repo.count_by_author(author.id).await?, 0);

    assert!(repo.restore(post.id).await?);
    assert!(repo.find_by_id(post.id).await?.is_some());
    assert_eq!(repo.count_by_author(author.id).await?, 1);

    Ok(())
}

/// Tests editing post content.
///
/// Expected: Ok with the new content
#[tokio::test]
async fn updates_content() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let post = factory::create_post(db, author.id).await?;

    let repo = PostRepository::new(db);
    let updated = repo.update(post.id, "Edited".to_string()).await?;

    assert_eq!(updated.content, "Edited");

    Ok(())
}
