use super::*;

/// Tests listing followers and followed users.
///
/// Expected: Ok with pages holding the users on the other end of each edge
#[tokio::test]
async fn lists_both_directions() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let ada = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;
    let cy = factory::user::create_user(db).await?;

    factory::create_follow(db, bob.id, ada.id).await?;
    factory::create_follow(db, cy.id, ada.id).await?;
    factory::create_follow(db, ada.id, cy.id).await?;

    let repo = FollowRepository::new(db);

    let followers = repo.followers(ada.id, PageRequest::new(0, 10)).await?;
    let mut follower_ids: Vec<i32> = followers.items.iter().map(|u| u.id).collect();
    follower_ids.sort();
    assert_eq!(follower_ids, vec![bob.id, cy.id]);
    assert_eq!(followers.total, 2);

    let following = repo.following(ada.id, PageRequest::new(0, 10)).await?;
    assert_eq!(following.items.len(), 1);
    assert_eq!(following.items[0].id, cy.id);

    Ok(())
}

/// Tests paginating followers.
///
/// Expected: Ok with one item per page and two pages in total
#[tokio::test]
async fn paginates_followers() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let ada = factory::user::create_user(db).await?;
    for _ in 0..2 {
        let fan = factory::user::create_user(db).await?;
        factory::create_follow(db, fan.id, ada.id).await?;
    }

    let repo = FollowRepository::new(db);
    let page = repo.followers(ada.id, PageRequest::new(1, 1)).await?;

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 2);

    Ok(())
}
