use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct NotificationDto {
    pub id: i32,
    pub actor_id: Option<i32>,
    pub kind: String,
    pub message: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct NotificationFilterParams {
    #[serde(default)]
    pub unread_only: bool,
}
