//! User listing DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// List users query parameters
///
/// Kept as raw strings: malformed values fall back to defaults instead of
/// being rejected by the extractor.
#[derive(Debug, Default, PartialEq, Eq, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Page number, 1-based. Default: 1
    pub page: Option<String>,
    /// Page size. Default: 10, capped by configuration
    pub limit: Option<String>,
}

impl ListUsersQuery {
    /// Build from raw query pairs. The first occurrence of a repeated key wins
    /// and unknown keys are ignored, so no query string is ever rejected.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Public shape of a user in the list payload under the default projection.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = User)]
pub struct UserDto {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    /// RFC 3339 timestamp of the last update
    pub updated_at: String,
}
