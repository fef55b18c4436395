use super::*;

/// Tests walking a feed with cursors.
///
/// Verifies that each slice continues strictly below the previous cursor and that the
/// last slice carries no cursor.
///
/// Expected: Ok with slices of 2, 2 and 1 posts, newest first
#[tokio::test]
async fn pages_newest_first_with_cursor() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(factory::create_post(db, author.id).await?.id);
    }
    ids.reverse();

    let repo = PostRepository::new(db);

    let first = repo
        .by_authors(&[author.id], CursorRequest { before: None, limit: 2 })
        .await?;
    assert_eq!(first.items.iter().map(|p| p.id).collect::<Vec<_>>(), ids[0..2].to_vec());
    assert_eq!(first.next_cursor, Some(ids[1]));

    let second = repo
        .by_authors(
            &[author.id],
            CursorRequest {
                before: first.next_cursor,
                limit: 2,
            },
        )
        .await?;
    assert_eq!(second.items.iter().map(|p| p.id).collect::<Vec<_>>(), ids[2..4].to_vec());

    let last = repo
        .by_authors(
            &[author.id],
            CursorRequest {
                before: second.next_cursor,
                limit: 2,
            },
        )
        .await?;
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.next_cursor, None);

    Ok(())
}

/// Tests that only the requested authors' live posts appear.
///
/// Expected: Ok with the single live post of the followed author
#[tokio::test]
async fn filters_authors_and_deleted_posts() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let followed = factory::user::create_user(db).await?;
    let stranger = factory::user::create_user(db).await?;
    let live = factory::create_post(db, followed.id).await?;
    PostFactory::new(db, followed.id).deleted(true).build().await?;
    factory::create_post(db, stranger.id).await?;

    let repo = PostRepository::new(db);
    let page = repo
        .by_authors(&[followed.id], CursorRequest { before: None, limit: 10 })
        .await?;

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, live.id);
    assert!(repo
        .by_authors(&[], CursorRequest { before: None, limit: 10 })
        .await?
        .items
        .is_empty());

    Ok(())
}
