use super::*;
use crate::server::{
    model::club::{ClubRole, CreateClubParam},
    service::club::{ClubService, EventForm},
};

fn event_form(club_id: Option<i32>, capacity: Option<i32>) -> EventForm {
    let starts_at = Utc::now() + Duration::days(2);
    EventForm {
        club_id,
        organization_id: None,
        title: "Reading night".to_string(),
        description: None,
        location: Some("Library".to_string()),
        starts_at,
        ends_at: starts_at + Duration::hours(3),
        capacity,
    }
}

/// Tests founding a club and its membership rules.
///
/// Expected: creator leads, joining twice is Conflict, the last leader cannot leave
#[tokio::test]
async fn club_membership_rules() -> Result<(), AppError> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let founder = User::from_entity(factory::user::create_user(db).await?);
    let student = User::from_entity(factory::user::create_user(db).await?);

    let service = ClubService::new(db);
    let club = service
        .create(
            &founder,
            CreateClubParam {
                organization_id: None,
                name: " Chess ".to_string(),
                description: None,
                created_by: 0,
            },
        )
        .await?;
    assert_eq!(club.name, "Chess");
    assert_eq!(club.created_by, founder.id);

    service.join(&student, club.id).await?;
    let again = service.join(&student, club.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let (_, member_count) = service.get(club.id).await?;
    assert_eq!(member_count, 2);

    let members = service.members(club.id).await?;
    assert!(members
        .iter()
        .any(|m| m.user.id == founder.id && m.role == ClubRole::Leader));

    let leave = service.leave(&founder, club.id).await;
    assert!(matches!(leave, Err(AppError::Conflict(_))));

    service.leave(&student, club.id).await?;

    Ok(())
}

/// Tests scheduling club events.
///
/// Expected: Forbidden for non-leaders, Validation for inverted times, Ok for the leader
#[tokio::test]
async fn club_events_need_leader() -> Result<(), AppError> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let leader = User::from_entity(factory::user::create_user(db).await?);
    let member = User::from_entity(factory::user::create_user(db).await?);
    let club = factory::club::create_club(db, leader.id).await?;
    factory::club::create_club_member(db, club.id, member.id, "member").await?;

    let service = ClubService::new(db);

    let denied = service
        .create_event(&member, event_form(Some(club.id), None))
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let mut inverted = event_form(Some(club.id), None);
    inverted.ends_at = inverted.starts_at - Duration::hours(1);
    let invalid = service.create_event(&leader, inverted).await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));

    let event = service
        .create_event(&leader, event_form(Some(club.id), Some(20)))
        .await?;
    assert_eq!(event.club_id, Some(club.id));
    assert_eq!(event.capacity, Some(20));

    Ok(())
}

/// Tests RSVPs against a capacity of one.
///
/// Expected: the first RSVP fills the event, the second user gets Conflict
#[tokio::test]
async fn rsvp_respects_capacity() -> Result<(), AppError> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let host = factory::user::create_user(db).await?;
    let first = User::from_entity(factory::user::create_user(db).await?);
    let second = User::from_entity(factory::user::create_user(db).await?);
    let event = factory::club::EventFactory::new(db, host.id)
        .capacity(1)
        .build()
        .await?;

    let service = ClubService::new(db);
    service.rsvp(&first, event.id).await?;

    let duplicate = service.rsvp(&first, event.id).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let full = service.rsvp(&second, event.id).await;
    assert!(matches!(full, Err(AppError::Conflict(_))));

    let view = service.get_event(&first, event.id).await?;
    assert_eq!(view.attendee_count, 1);
    assert!(view.attending);

    service.cancel_rsvp(&first, event.id).await?;
    service.rsvp(&second, event.id).await?;

    let missing = service.cancel_rsvp(&first, event.id).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests the upcoming events listing.
///
/// Expected: past events are left out
#[tokio::test]
async fn upcoming_skips_past_events() -> Result<(), AppError> {
    let test = TestBuilder::new().with_club_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let host = User::from_entity(factory::user::create_user(db).await?);
    factory::club::EventFactory::new(db, host.id)
        .starts_at(Utc::now() - Duration::days(3))
        .build()
        .await?;
    let upcoming = factory::club::EventFactory::new(db, host.id).build().await?;

    let events = ClubService::new(db)
        .upcoming_events(&host, None, None, PageRequest::default())
        .await?;

    assert_eq!(events.total, 1);
    assert_eq!(events.items[0].event.id, upcoming.id);
    assert!(!events.items[0].attending);

    Ok(())
}
