use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lightweight client ping, persisted for uptime monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: Uuid,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusCheck {
    pub fn new(client_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_name,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheckRequest {
    pub client_name: String,
}
