use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{data::invitation::InvitationRepository, error::AppError};

/// Starts the cleanup scheduler
///
/// Each run flips overdue pending invitations to expired. The HTTP cleanup endpoint
/// performs the same sweep for deployments that drive it from an external cron.
///
/// # Arguments
/// - `db`: Database connection
/// - `cron`: Six-field cron expression, seconds first
pub async fn start_scheduler(db: DatabaseConnection, cron: &str) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let db = job_db.clone();

        Box::pin(async move {
            if let Err(e) = run_cleanup(&db).await {
                tracing::error!("Error running invitation cleanup: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Invitation cleanup scheduler started with schedule '{}'", cron);

    Ok(())
}

async fn run_cleanup(db: &DatabaseConnection) -> Result<(), AppError> {
    let expired = InvitationRepository::new(db)
        .expire_overdue(Utc::now())
        .await?;
    if expired > 0 {
        tracing::info!("Expired {} overdue invitations", expired);
    }

    Ok(())
}
