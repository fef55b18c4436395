//! Clubs, club membership, events and RSVPs.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::{active_user_ids, fetch_page, users_by_id},
    model::{
        club::{Club, ClubMember, ClubRole, CreateClubParam, CreateEventParam, Event},
        PageRequest, Paginated,
    },
    util::parse::{parse_stored, StoredEnum},
};

pub struct ClubRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClubRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts the club row only; the creator's leader membership is added separately.
    pub async fn create(&self, param: CreateClubParam) -> Result<Club, DbErr> {
        let entity = entity::club::ActiveModel {
            organization_id: ActiveValue::Set(param.organization_id),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            created_by: ActiveValue::Set(param.created_by),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Club::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Club>, DbErr> {
        let entity = entity::prelude::Club::find_by_id(id)
            .filter(entity::club::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Club::from_entity))
    }

    /// Clubs ordered by name, optionally limited to one organization.
    pub async fn list(
        &self,
        organization_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Paginated<Club>, DbErr> {
        let mut select =
            entity::prelude::Club::find().filter(entity::club::Column::DeletedAt.is_null());

        if let Some(organization_id) = organization_id {
            select = select.filter(entity::club::Column::OrganizationId.eq(organization_id));
        }

        let select = select
            .order_by_asc(entity::club::Column::Name)
            .order_by_asc(entity::club::Column::Id);

        Ok(fetch_page(self.db, select, page).await?.map(Club::from_entity))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Club::update_many()
            .col_expr(entity::club::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::club::Column::Id.eq(id))
            .filter(entity::club::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn member_role(&self, club_id: i32, user_id: i32) -> Result<Option<ClubRole>, DbErr> {
        entity::prelude::ClubMember::find_by_id((club_id, user_id))
            .one(self.db)
            .await?
            .map(|row| parse_stored(&row.role))
            .transpose()
    }

    pub async fn add_member(&self, club_id: i32, user_id: i32, role: ClubRole) -> Result<(), DbErr> {
        entity::club_member::ActiveModel {
            club_id: ActiveValue::Set(club_id),
            user_id: ActiveValue::Set(user_id),
            role: ActiveValue::Set(role.as_str().to_string()),
            joined_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn remove_member(&self, club_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::ClubMember::delete_by_id((club_id, user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Members with their profiles, leaders first, then by join date.
    pub async fn members(&self, club_id: i32) -> Result<Vec<ClubMember>, DbErr> {
        let rows = entity::prelude::ClubMember::find()
            .filter(entity::club_member::Column::ClubId.eq(club_id))
            .filter(entity::club_member::Column::UserId.in_subquery(active_user_ids()))
            .order_by_asc(entity::club_member::Column::JoinedAt)
            .all(self.db)
            .await?;

        let mut users = users_by_id(self.db, rows.iter().map(|row| row.user_id)).await?;

        let mut members = rows
            .into_iter()
            .filter_map(|row| {
                users
                    .remove(&row.user_id)
                    .map(|user| ClubMember::from_entity(row, user))
            })
            .collect::<Result<Vec<_>, _>>()?;

        members.sort_by_key(|member| member.role != ClubRole::Leader);

        Ok(members)
    }

    pub async fn count_role(&self, club_id: i32, role: ClubRole) -> Result<u64, DbErr> {
        entity::prelude::ClubMember::find()
            .filter(entity::club_member::Column::ClubId.eq(club_id))
            .filter(entity::club_member::Column::Role.eq(role.as_str()))
            .count(self.db)
            .await
    }

    /// Member counts per club. Clubs without members are absent from the map.
    pub async fn member_counts(&self, club_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if club_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = entity::prelude::ClubMember::find()
            .select_only()
            .column(entity::club_member::Column::ClubId)
            .column_as(Expr::col(entity::club_member::Column::UserId).count(), "count")
            .filter(entity::club_member::Column::ClubId.is_in(club_ids.iter().copied()))
            .group_by(entity::club_member::Column::ClubId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(club_id, count)| (club_id, count as u64))
            .collect())
    }
}

pub struct EventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateEventParam) -> Result<Event, DbErr> {
        let entity = entity::event::ActiveModel {
            club_id: ActiveValue::Set(param.club_id),
            organization_id: ActiveValue::Set(param.organization_id),
            created_by: ActiveValue::Set(param.created_by),
            title: ActiveValue::Set(param.title),
            description: ActiveValue::Set(param.description),
            location: ActiveValue::Set(param.location),
            starts_at: ActiveValue::Set(param.starts_at),
            ends_at: ActiveValue::Set(param.ends_at),
            capacity: ActiveValue::Set(param.capacity),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Event::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Event>, DbErr> {
        let entity = entity::prelude::Event::find_by_id(id)
            .filter(entity::event::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Event::from_entity))
    }

    /// Events that have not ended by `now`, soonest first.
    pub async fn list_upcoming(
        &self,
        club_id: Option<i32>,
        organization_id: Option<i32>,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Paginated<Event>, DbErr> {
        let mut select = entity::prelude::Event::find()
            .filter(entity::event::Column::DeletedAt.is_null())
            .filter(entity::event::Column::EndsAt.gt(now));

        if let Some(club_id) = club_id {
            select = select.filter(entity::event::Column::ClubId.eq(club_id));
        }
        if let Some(organization_id) = organization_id {
            select = select.filter(entity::event::Column::OrganizationId.eq(organization_id));
        }

        let select = select
            .order_by_asc(entity::event::Column::StartsAt)
            .order_by_asc(entity::event::Column::Id);

        Ok(fetch_page(self.db, select, page).await?.map(Event::from_entity))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Event::update_many()
            .col_expr(entity::event::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::event::Column::Id.eq(id))
            .filter(entity::event::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_attending(&self, event_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let row = entity::prelude::EventAttendee::find_by_id((event_id, user_id))
            .one(self.db)
            .await?;

        Ok(row.is_some())
    }

    pub async fn attend(&self, event_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::event_attendee::ActiveModel {
            event_id: ActiveValue::Set(event_id),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn unattend(&self, event_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::EventAttendee::delete_by_id((event_id, user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn attendee_count(&self, event_id: i32) -> Result<u64, DbErr> {
        entity::prelude::EventAttendee::find()
            .filter(entity::event_attendee::Column::EventId.eq(event_id))
            .count(self.db)
            .await
    }

    /// Attendee counts per event. Events without RSVPs are absent from the map.
    pub async fn attendee_counts(&self, event_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = entity::prelude::EventAttendee::find()
            .select_only()
            .column(entity::event_attendee::Column::EventId)
            .column_as(
                Expr::col(entity::event_attendee::Column::UserId).count(),
                "count",
            )
            .filter(entity::event_attendee::Column::EventId.is_in(event_ids.iter().copied()))
            .group_by(entity::event_attendee::Column::EventId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(event_id, count)| (event_id, count as u64))
            .collect())
    }

    /// The subset of `event_ids` that `user_id` has RSVPed to.
    pub async fn attending_ids(
        &self,
        user_id: i32,
        event_ids: &[i32],
    ) -> Result<HashSet<i32>, DbErr> {
        if event_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i32> = entity::prelude::EventAttendee::find()
            .select_only()
            .column(entity::event_attendee::Column::EventId)
            .filter(entity::event_attendee::Column::UserId.eq(user_id))
            .filter(entity::event_attendee::Column::EventId.is_in(event_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(ids.into_iter().collect())
    }
}
