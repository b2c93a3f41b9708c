use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory entry.
///
/// Serialized with camelCase keys; which of them leave the service is decided
/// by the configured public projection, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
