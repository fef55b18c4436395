use super::*;

/// Tests creating a club and managing its membership.
///
/// Expected: Ok with roles reported by `member_role`
#[tokio::test]
async fn creates_club_and_members() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let founder = factory::user::create_user(db).await?;
    let joiner = factory::user::create_user(db).await?;

    let repo = ClubRepository::new(db);
    let club = repo
        .create(CreateClubParam {
            organization_id: None,
            name: "Chess".to_string(),
            description: None,
            created_by: founder.id,
        })
        .await?;
    repo.add_member(club.id, founder.id, ClubRole::Leader).await?;
    repo.add_member(club.id, joiner.id, ClubRole::Member).await?;

    assert_eq!(
        repo.member_role(club.id, joiner.id).await?,
        Some(ClubRole::Member)
    );
    assert_eq!(repo.count_role(club.id, ClubRole::Leader).await?, 1);

    assert!(repo.remove_member(club.id, joiner.id).await?);
    assert_eq!(repo.member_role(club.id, joiner.id).await?, None);

    Ok(())
}

/// Tests that leaders are listed before members.
///
/// Expected: Ok with the late-joining leader first
#[tokio::test]
async fn lists_leaders_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let founder = factory::user::create_user(db).await?;
    let member = factory::user::create_user(db).await?;
    let co_leader = factory::user::create_user(db).await?;
    let club = factory::club::create_club(db, founder.id).await?;
    factory::club::create_club_member(db, club.id, member.id, "member").await?;
    factory::club::create_club_member(db, club.id, co_leader.id, "leader").await?;

    let repo = ClubRepository::new(db);
    let members = repo.members(club.id).await?;

    let roles: Vec<ClubRole> = members.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![ClubRole::Leader, ClubRole::Leader, ClubRole::Member]);
    assert_eq!(members[2].user.id, member.id);

    Ok(())
}

/// Tests batch member counts and deleted clubs.
///
/// Expected: Ok with per-club counts and the deleted club hidden from lists
#[tokio::test]
async fn counts_members_and_hides_deleted() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let founder = factory::user::create_user(db).await?;
    let member = factory::user::create_user(db).await?;
    let busy = factory::club::create_club(db, founder.id).await?;
    let quiet = factory::club::create_club(db, founder.id).await?;
    factory::club::create_club_member(db, busy.id, member.id, "member").await?;

    let repo = ClubRepository::new(db);
    let counts = repo.member_counts(&[busy.id, quiet.id]).await?;
    assert_eq!(counts.get(&busy.id), Some(&2));
    assert_eq!(counts.get(&quiet.id), Some(&1));

    assert!(repo.soft_delete(quiet.id).await?);
    assert!(repo.find_by_id(quiet.id).await?.is_none());
    assert_eq!(repo.list(None, PageRequest::new(0, 10)).await?.total, 1);

    Ok(())
}
