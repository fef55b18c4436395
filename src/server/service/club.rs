//! Clubs, their members and the events they run.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        audit::AuditRepository,
        club::{ClubRepository, EventRepository},
    },
    error::{validation::ValidationError, AppError},
    model::{
        audit::{entity_type, RecordAuditParam},
        club::{Club, ClubMember, ClubRole, CreateClubParam, CreateEventParam, Event, EventView},
        organization::OrgRole,
        user::User,
        PageRequest, Paginated,
    },
    service::organization::{find_organization, require_org_role},
};

/// Event fields as submitted by the client.
#[derive(Debug, Clone)]
pub struct EventForm {
    pub club_id: Option<i32>,
    pub organization_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
}

pub struct ClubService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> ClubService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Founds a club led by its creator.
    ///
    /// # Returns
    /// - `Ok(Club)` - The club; the creator is its first leader
    /// - `Err(AppError::Forbidden)` - Organization club requested by a non-member
    pub async fn create(&self, actor: &User, param: CreateClubParam) -> Result<Club, AppError> {
        if let Some(organization_id) = param.organization_id {
            find_organization(self.db, organization_id).await?;
            require_org_role(self.db, organization_id, actor.id, |_| true).await?;
        }

        let param = CreateClubParam {
            name: param.name.trim().to_string(),
            description: param
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_by: actor.id,
            ..param
        };

        let mut errors = ValidationError::new();
        errors.check_length("name", &param.name, 1, 100);
        errors.check_max_length("description", param.description.as_deref(), 2000);
        errors.finish()?;

        let txn = self.db.begin().await?;
        let club_repo = ClubRepository::new(&txn);
        let club = club_repo.create(param).await?;
        club_repo
            .add_member(club.id, actor.id, ClubRole::Leader)
            .await?;
        txn.commit().await?;

        Ok(club)
    }

    /// Clubs with their member counts.
    pub async fn list(
        &self,
        organization_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Paginated<(Club, u64)>, AppError> {
        let club_repo = ClubRepository::new(self.db);
        let clubs = club_repo.list(organization_id, page).await?;

        let ids: Vec<i32> = clubs.items.iter().map(|club| club.id).collect();
        let counts = club_repo.member_counts(&ids).await?;

        Ok(clubs.map(|club| {
            let count = counts.get(&club.id).copied().unwrap_or(0);
            (club, count)
        }))
    }

    pub async fn get(&self, club_id: i32) -> Result<(Club, u64), AppError> {
        let club = self.find(club_id).await?;
        let counts = ClubRepository::new(self.db)
            .member_counts(&[club.id])
            .await?;
        let count = counts.get(&club.id).copied().unwrap_or(0);

        Ok((club, count))
    }

    pub async fn join(&self, actor: &User, club_id: i32) -> Result<(), AppError> {
        let club = self.find(club_id).await?;

        let club_repo = ClubRepository::new(self.db);
        if club_repo.member_role(club.id, actor.id).await?.is_some() {
            return Err(AppError::Conflict(
                "You are already a member of this club".to_string(),
            ));
        }

        club_repo
            .add_member(club.id, actor.id, ClubRole::Member)
            .await?;

        Ok(())
    }

    /// Leaves a club. The last leader has to stay.
    pub async fn leave(&self, actor: &User, club_id: i32) -> Result<(), AppError> {
        let club = self.find(club_id).await?;

        let txn = self.db.begin().await?;
        let club_repo = ClubRepository::new(&txn);

        let role = club_repo
            .member_role(club.id, actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("You are not a member of this club".to_string()))?;

        if role == ClubRole::Leader && club_repo.count_role(club.id, ClubRole::Leader).await? <= 1
        {
            return Err(AppError::Conflict(
                "The last leader cannot leave the club".to_string(),
            ));
        }

        club_repo.remove_member(club.id, actor.id).await?;
        txn.commit().await?;

        Ok(())
    }

    pub async fn members(&self, club_id: i32) -> Result<Vec<ClubMember>, AppError> {
        let club = self.find(club_id).await?;

        Ok(ClubRepository::new(self.db).members(club.id).await?)
    }

    /// Soft deletes a club. Leaders only.
    pub async fn delete(&self, actor: &User, club_id: i32) -> Result<(), AppError> {
        let club = self.find(club_id).await?;
        self.ensure_leader(actor, club.id).await?;

        let txn = self.db.begin().await?;
        ClubRepository::new(&txn).soft_delete(club.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(actor.id, "club.deleted", entity_type::CLUB, club.id)
                    .details(serde_json::json!({ "name": club.name })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Schedules an event.
    ///
    /// Club events need a leader of the club and inherit its organization.
    /// Organization events need an owner or admin. Standalone events are open to anyone.
    ///
    /// # Returns
    /// - `Ok(Event)` - The created event
    /// - `Err(AppError::Validation)` - Title too long, capacity below one, or the event
    ///   ends before it starts
    /// - `Err(AppError::Forbidden)` - Missing club or organization role
    pub async fn create_event(&self, actor: &User, form: EventForm) -> Result<Event, AppError> {
        let organization_id = match form.club_id {
            Some(club_id) => {
                let club = self.find(club_id).await?;
                self.ensure_leader(actor, club.id).await?;
                club.organization_id
            }
            None => {
                if let Some(organization_id) = form.organization_id {
                    find_organization(self.db, organization_id).await?;
                    require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager)
                        .await?;
                }
                form.organization_id
            }
        };

        let title = form.title.trim().to_string();
        let description = form
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let location = form
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        let mut errors = ValidationError::new();
        errors.check_length("title", &title, 1, 200);
        errors.check_max_length("description", description.as_deref(), 5000);
        errors.check_max_length("location", location.as_deref(), 200);
        errors.check(
            "ends_at",
            form.ends_at > form.starts_at,
            "must be after starts_at",
        );
        if let Some(capacity) = form.capacity {
            errors.check("capacity", capacity >= 1, "must be at least 1");
        }
        errors.finish()?;

        Ok(EventRepository::new(self.db)
            .create(CreateEventParam {
                club_id: form.club_id,
                organization_id,
                created_by: actor.id,
                title,
                description,
                location,
                starts_at: form.starts_at,
                ends_at: form.ends_at,
                capacity: form.capacity,
            })
            .await?)
    }

    /// Events that have not ended yet, soonest first, with the viewer's RSVP state.
    pub async fn upcoming_events(
        &self,
        viewer: &User,
        club_id: Option<i32>,
        organization_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Paginated<EventView>, AppError> {
        let event_repo = EventRepository::new(self.db);
        let events = event_repo
            .list_upcoming(club_id, organization_id, Utc::now(), page)
            .await?;

        let ids: Vec<i32> = events.items.iter().map(|event| event.id).collect();
        let counts = event_repo.attendee_counts(&ids).await?;
        let attending = event_repo.attending_ids(viewer.id, &ids).await?;

        Ok(events.map(|event| EventView {
            attendee_count: counts.get(&event.id).copied().unwrap_or(0),
            attending: attending.contains(&event.id),
            event,
        }))
    }

    pub async fn get_event(&self, viewer: &User, event_id: i32) -> Result<EventView, AppError> {
        let event = self.find_event(event_id).await?;

        let event_repo = EventRepository::new(self.db);
        let attendee_count = event_repo.attendee_count(event.id).await?;
        let attending = event_repo.is_attending(event.id, viewer.id).await?;

        Ok(EventView {
            event,
            attendee_count,
            attending,
        })
    }

    /// RSVPs to an event.
    ///
    /// The capacity check and the insert share a transaction.
    ///
    /// # Returns
    /// - `Ok(())` - The actor attends
    /// - `Err(AppError::Conflict)` - Already attending, or the event is full
    pub async fn rsvp(&self, actor: &User, event_id: i32) -> Result<(), AppError> {
        let event = self.find_event(event_id).await?;

        let txn = self.db.begin().await?;
        let event_repo = EventRepository::new(&txn);

        if event_repo.is_attending(event.id, actor.id).await? {
            return Err(AppError::Conflict(
                "You are already attending this event".to_string(),
            ));
        }
        if event.is_full(event_repo.attendee_count(event.id).await?) {
            return Err(AppError::Conflict("This event is full".to_string()));
        }

        event_repo.attend(event.id, actor.id).await?;
        txn.commit().await?;

        Ok(())
    }

    pub async fn cancel_rsvp(&self, actor: &User, event_id: i32) -> Result<(), AppError> {
        let event = self.find_event(event_id).await?;

        if !EventRepository::new(self.db)
            .unattend(event.id, actor.id)
            .await?
        {
            return Err(AppError::NotFound(
                "You are not attending this event".to_string(),
            ));
        }

        Ok(())
    }

    /// Soft deletes an event. Its creator only.
    pub async fn delete_event(&self, actor: &User, event_id: i32) -> Result<(), AppError> {
        let event = self.find_event(event_id).await?;
        if event.created_by != actor.id {
            return Err(AppError::Forbidden(
                "Only the creator can delete this event".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        EventRepository::new(&txn).soft_delete(event.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(actor.id, "event.deleted", entity_type::EVENT, event.id)
                    .details(serde_json::json!({ "title": event.title })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    async fn find(&self, club_id: i32) -> Result<Club, AppError> {
        ClubRepository::new(self.db)
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Club not found".to_string()))
    }

    async fn find_event(&self, event_id: i32) -> Result<Event, AppError> {
        EventRepository::new(self.db)
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    async fn ensure_leader(&self, actor: &User, club_id: i32) -> Result<(), AppError> {
        let role = ClubRepository::new(self.db)
            .member_role(club_id, actor.id)
            .await?;

        if role != Some(ClubRole::Leader) {
            return Err(AppError::Forbidden(
                "Only club leaders can do this".to_string(),
            ));
        }

        Ok(())
    }
}
