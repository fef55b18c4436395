use super::*;

/// Tests liking and unliking a post.
///
/// Expected: Ok, with a duplicate like rejected by the primary key
#[tokio::test]
async fn likes_once_per_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let fan = factory::user::create_user(db).await?;
    let post = factory::create_post(db, author.id).await?;

    let repo = LikeRepository::new(db);
    repo.create(post.id, fan.id).await?;

    assert!(repo.exists(post.id, fan.id).await?);
    assert!(repo.create(post.id, fan.id).await.is_err());
    assert!(repo.delete(post.id, fan.id).await?);
    assert!(!repo.exists(post.id, fan.id).await?);

    Ok(())
}

/// Tests batch like counts and the viewer's liked set.
///
/// Expected: Ok with two likes on the first post and only it liked by the viewer
#[tokio::test]
async fn counts_likes_in_batch() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let viewer = factory::user::create_user(db).await?;
    let popular = factory::create_post(db, author.id).await?;
    let other = factory::create_post(db, author.id).await?;
    factory::post::create_like(db, popular.id, viewer.id).await?;
    factory::post::create_like(db, popular.id, author.id).await?;

    let repo = LikeRepository::new(db);
    let counts = repo.count_for_posts(&[popular.id, other.id]).await?;
    let liked = repo.liked_by(viewer.id, &[popular.id, other.id]).await?;

    assert_eq!(counts.get(&popular.id), Some(&2));
    assert!(!counts.contains_key(&other.id));
    assert!(liked.contains(&popular.id));
    assert!(!liked.contains(&other.id));

    Ok(())
}
