//! Organizations and their school/faculty hierarchy.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::organization::{FacultyDto, FacultyMemberDto, MemberDto, OrganizationDto, SchoolDto},
    server::{
        model::user::User,
        util::parse::{parse_stored, StoredEnum},
    },
};

/// Role of a user inside an organization, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgRole {
    Owner,
    Admin,
    Instructor,
    Member,
}

impl StoredEnum for OrgRole {
    const KIND: &'static str = "organization role";
    const ALL: &'static [Self] = &[Self::Owner, Self::Admin, Self::Instructor, Self::Member];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Instructor => "instructor",
            Self::Member => "member",
        }
    }
}

impl OrgRole {
    /// Owners and admins manage members, invitations, schools and faculties.
    pub fn is_manager(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Staff may author courses and see unpublished ones.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Instructor)
    }

    /// Ownership is only ever granted by an existing owner, never through an invitation.
    pub fn is_invitable(self) -> bool {
        !matches!(self, Self::Owner)
    }

    /// Whether a member holding `self` may assign `target` to someone or change
    /// the role of someone currently holding `target`.
    pub fn can_manage_role(self, target: Self) -> bool {
        match self {
            Self::Owner => true,
            Self::Admin => matches!(target, Self::Instructor | Self::Member),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn from_entity(entity: entity::organization::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            description: entity.description,
            website: entity.website,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> OrganizationDto {
        OrganizationDto {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            website: self.website,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub organization_id: i32,
    pub user_id: i32,
    pub role: OrgRole,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn from_entity(entity: entity::organization_member::Model) -> Result<Self, DbErr> {
        Ok(Self {
            organization_id: entity.organization_id,
            user_id: entity.user_id,
            role: parse_stored(&entity.role)?,
            joined_at: entity.joined_at,
        })
    }
}

/// A membership joined with the member's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub user: User,
    pub role: OrgRole,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn into_dto(self) -> MemberDto {
        MemberDto {
            user: self.user.into_dto(),
            role: self.role.as_str().to_string(),
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrganizationParam {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_by: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateOrganizationParam {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Slugs are 3 to 50 characters of lowercase letters, digits and hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    (3..=50).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl School {
    pub fn from_entity(entity: entity::school::Model) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            name: entity.name,
            description: entity.description,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> SchoolDto {
        SchoolDto {
            id: self.id,
            organization_id: self.organization_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Faculty {
    pub id: i32,
    pub school_id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Faculty {
    pub fn from_entity(entity: entity::faculty::Model) -> Self {
        Self {
            id: entity.id,
            school_id: entity.school_id,
            organization_id: entity.organization_id,
            name: entity.name,
            description: entity.description,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> FacultyDto {
        FacultyDto {
            id: self.id,
            school_id: self.school_id,
            organization_id: self.organization_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

/// Name and description shared by schools and faculties.
#[derive(Debug, Clone)]
pub struct UnitParam {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacultyMember {
    pub user: User,
    pub title: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl FacultyMember {
    pub fn into_dto(self) -> FacultyMemberDto {
        FacultyMemberDto {
            user: self.user.into_dto(),
            title: self.title,
            joined_at: self.joined_at,
        }
    }
}

impl From<crate::model::organization::UpdateOrganizationDto> for UpdateOrganizationParam {
    fn from(dto: crate::model::organization::UpdateOrganizationDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            website: dto.website,
        }
    }
}

impl From<crate::model::organization::UnitDto> for UnitParam {
    fn from(dto: crate::model::organization::UnitDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
        }
    }
}
