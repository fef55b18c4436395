//! Research projects and collaboration requests.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        audit::AuditRepository, notification::NotificationRepository,
        research::ResearchRepository, user::UserRepository,
    },
    error::{validation::ValidationError, AppError},
    model::{
        audit::{entity_type, RecordAuditParam},
        notification::{CreateNotificationParam, NotificationKind},
        research::{
            Collaborator, CollaboratorStatus, Research, ResearchDetails, ResearchParam,
            ResearchStatus,
        },
        user::User,
        PageRequest, Paginated,
    },
    service::organization::{find_organization, require_org_role},
};

pub struct ResearchService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> ResearchService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Starts a project owned by the actor. Linking it to an organization requires
    /// membership there.
    pub async fn create(&self, actor: &User, param: ResearchParam) -> Result<Research, AppError> {
        if let Some(organization_id) = param.organization_id {
            find_organization(self.db, organization_id).await?;
            require_org_role(self.db, organization_id, actor.id, |_| true).await?;
        }

        let param = validate_research(param)?;

        Ok(ResearchRepository::new(self.db)
            .create(actor.id, param)
            .await?)
    }

    pub async fn list(
        &self,
        status: Option<ResearchStatus>,
        page: PageRequest,
    ) -> Result<Paginated<Research>, AppError> {
        Ok(ResearchRepository::new(self.db).list(status, page).await?)
    }

    /// A project with its owner and accepted collaborators.
    pub async fn get(&self, research_id: i32) -> Result<ResearchDetails, AppError> {
        let research = self.find(research_id).await?;

        let owner = UserRepository::new(self.db)
            .find_by_id(research.owner_id)
            .await?
            .ok_or_else(research_not_found)?;
        let collaborators = ResearchRepository::new(self.db)
            .collaborators(research.id, Some(CollaboratorStatus::Accepted))
            .await?
            .into_iter()
            .map(|collaborator| collaborator.user)
            .collect();

        Ok(ResearchDetails {
            research,
            owner,
            collaborators,
        })
    }

    /// Edits a project. Owner only; the linked organization stays as it was.
    pub async fn update(
        &self,
        actor: &User,
        research_id: i32,
        param: ResearchParam,
    ) -> Result<Research, AppError> {
        let research = self.find_owned(actor, research_id).await?;

        let param = validate_research(ResearchParam {
            organization_id: research.organization_id,
            ..param
        })?;

        Ok(ResearchRepository::new(self.db)
            .update(research.id, param)
            .await?)
    }

    pub async fn delete(&self, actor: &User, research_id: i32) -> Result<(), AppError> {
        let research = self.find_owned(actor, research_id).await?;

        let txn = self.db.begin().await?;
        ResearchRepository::new(&txn).soft_delete(research.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(
                    actor.id,
                    "research.deleted",
                    entity_type::RESEARCH,
                    research.id,
                )
                .details(serde_json::json!({ "title": research.title })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Asks to join a recruiting project.
    ///
    /// # Returns
    /// - `Ok(())` - A pending request was recorded and the owner notified
    /// - `Err(AppError::Conflict)` - The project is not recruiting, or the actor already
    ///   has a request in any status
    /// - `Err(AppError::BadRequest)` - The owner asked to join their own project
    pub async fn request_collaboration(
        &self,
        actor: &User,
        research_id: i32,
        message: Option<String>,
    ) -> Result<(), AppError> {
        let research = self.find(research_id).await?;

        if research.status != ResearchStatus::Recruiting {
            return Err(AppError::Conflict(
                "This project is not recruiting collaborators".to_string(),
            ));
        }
        if research.owner_id == actor.id {
            return Err(AppError::BadRequest(
                "You own this project".to_string(),
            ));
        }

        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let mut errors = ValidationError::new();
        errors.check_max_length("message", message.as_deref(), 2000);
        errors.finish()?;

        if ResearchRepository::new(self.db)
            .collaborator_status(research.id, actor.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already asked to collaborate on this project".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        ResearchRepository::new(&txn)
            .request_collaboration(research.id, actor.id, message)
            .await?;
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    research.owner_id,
                    actor.id,
                    NotificationKind::CollaborationRequested,
                    format!("{} wants to collaborate on {}", actor.name, research.title),
                )
                .link(format!("/research/{}", research.id)),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Accepts or rejects a pending collaboration request. Owner only.
    pub async fn respond(
        &self,
        actor: &User,
        research_id: i32,
        user_id: i32,
        accept: bool,
    ) -> Result<(), AppError> {
        let research = self.find_owned(actor, research_id).await?;

        let research_repo = ResearchRepository::new(self.db);
        match research_repo.collaborator_status(research.id, user_id).await? {
            Some(CollaboratorStatus::Pending) => {}
            Some(_) => return Err(already_answered()),
            None => {
                return Err(AppError::NotFound(
                    "Collaboration request not found".to_string(),
                ))
            }
        }

        let status = if accept {
            CollaboratorStatus::Accepted
        } else {
            CollaboratorStatus::Rejected
        };

        let txn = self.db.begin().await?;
        if !ResearchRepository::new(&txn)
            .respond(research.id, user_id, status)
            .await?
        {
            return Err(already_answered());
        }
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    user_id,
                    actor.id,
                    NotificationKind::CollaborationResponded,
                    if accept {
                        format!("You are now collaborating on {}", research.title)
                    } else {
                        format!("Your request to join {} was declined", research.title)
                    },
                )
                .link(format!("/research/{}", research.id)),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Leaves a project, or withdraws a request that is still pending.
    pub async fn leave(&self, actor: &User, research_id: i32) -> Result<(), AppError> {
        let research = self.find(research_id).await?;

        if !ResearchRepository::new(self.db)
            .remove_collaborator(research.id, actor.id)
            .await?
        {
            return Err(AppError::NotFound(
                "You are not a collaborator on this project".to_string(),
            ));
        }

        Ok(())
    }

    /// Collaborators of a project. The owner also sees pending and rejected requests.
    pub async fn collaborators(
        &self,
        viewer: &User,
        research_id: i32,
    ) -> Result<Vec<Collaborator>, AppError> {
        let research = self.find(research_id).await?;

        let status = if research.owner_id == viewer.id {
            None
        } else {
            Some(CollaboratorStatus::Accepted)
        };

        Ok(ResearchRepository::new(self.db)
            .collaborators(research.id, status)
            .await?)
    }

    async fn find(&self, research_id: i32) -> Result<Research, AppError> {
        ResearchRepository::new(self.db)
            .find_by_id(research_id)
            .await?
            .ok_or_else(research_not_found)
    }

    async fn find_owned(&self, actor: &User, research_id: i32) -> Result<Research, AppError> {
        let research = self.find(research_id).await?;

        if research.owner_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the project owner can do this".to_string(),
            ));
        }

        Ok(research)
    }
}

fn validate_research(param: ResearchParam) -> Result<ResearchParam, ValidationError> {
    let param = ResearchParam {
        title: param.title.trim().to_string(),
        summary: param.summary.trim().to_string(),
        field: param
            .field
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),
        ..param
    };

    let mut errors = ValidationError::new();
    errors.check_length("title", &param.title, 1, 200);
    errors.check_length("summary", &param.summary, 1, 5000);
    errors.check_max_length("field", param.field.as_deref(), 100);
    errors.finish()?;

    Ok(param)
}

fn research_not_found() -> AppError {
    AppError::NotFound("Research project not found".to_string())
}

fn already_answered() -> AppError {
    AppError::Conflict("This request has already been answered".to_string())
}
