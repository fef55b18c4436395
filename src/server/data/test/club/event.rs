use super::*;

/// Tests creating an event.
///
/// Expected: Ok with the stored schedule
#[tokio::test]
async fn creates_event() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let host = factory::user::create_user(db).await?;
    let club = factory::club::create_club(db, host.id).await?;
    let starts_at = Utc::now() + Duration::days(3);

    let repo = EventRepository::new(db);
    let event = repo
        .create(CreateEventParam {
            club_id: Some(club.id),
            organization_id: None,
            created_by: host.id,
            title: "Blitz night".to_string(),
            description: None,
            location: Some("Hall B".to_string()),
            starts_at,
            ends_at: starts_at + Duration::hours(3),
            capacity: Some(20),
        })
        .await?;

    let stored = repo.find_by_id(event.id).await?.unwrap();
    assert_eq!(stored.club_id, Some(club.id));
    assert_eq!(stored.capacity, Some(20));

    Ok(())
}

/// Tests the upcoming events list.
///
/// Verifies that finished and deleted events are excluded, that an event still in
/// progress is included, and that results are ordered by start time.
///
/// Expected: Ok with the running event before the future one
#[tokio::test]
async fn lists_upcoming_events() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let host = factory::user::create_user(db).await?;
    let club = factory::club::create_club(db, host.id).await?;
    let now = Utc::now();

    let future = EventFactory::new(db, host.id)
        .club_id(club.id)
        .build()
        .await?;
    let running = EventFactory::new(db, host.id)
        .club_id(club.id)
        .starts_at(now - Duration::hours(1))
        .build()
        .await?;
    EventFactory::new(db, host.id)
        .club_id(club.id)
        .starts_at(now - Duration::days(2))
        .build()
        .await?;
    let cancelled = EventFactory::new(db, host.id).build().await?;

    let repo = EventRepository::new(db);
    assert!(repo.soft_delete(cancelled.id).await?);

    let page = PageRequest::new(0, 10);
    let all = repo.list_upcoming(None, None, now, page).await?;
    let ids: Vec<i32> = all.items.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![running.id, future.id]);

    let other_club = repo
        .list_upcoming(Some(club.id + 1), None, now, page)
        .await?;
    assert_eq!(other_club.total, 0);

    Ok(())
}

/// Tests RSVPs and attendee counts.
///
/// Expected: Ok with counts and the viewer's attending set following each change
#[tokio::test]
async fn tracks_attendance() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let host = factory::user::create_user(db).await?;
    let guest = factory::user::create_user(db).await?;
    let event = EventFactory::new(db, host.id).capacity(2).build().await?;
    let other = EventFactory::new(db, host.id).build().await?;
    factory::club::create_attendee(db, event.id, host.id).await?;

    let repo = EventRepository::new(db);
    repo.attend(event.id, guest.id).await?;

    assert!(repo.is_attending(event.id, guest.id).await?);
    assert_eq!(repo.attendee_count(event.id).await?, 2);

    let counts = repo.attendee_counts(&[event.id, other.id]).await?;
    assert_eq!(counts.get(&event.id), Some(&2));
    assert!(!counts.contains_key(&other.id));

    let attending = repo.attending_ids(guest.id, &[event.id, other.id]).await?;
    assert!(attending.contains(&event.id));
    assert!(!attending.contains(&other.id));

    assert!(repo.unattend(event.id, guest.id).await?);
    assert!(!repo.unattend(event.id, guest.id).await?);
    assert_eq!(repo.attendee_count(event.id).await?, 1);

    Ok(())
}
