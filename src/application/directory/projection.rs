//! Public projection of records and assembly of the list payload.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::Slice;
use crate::shared::PaginationView;

/// Fields exposed for a user when no projection is configured.
pub const DEFAULT_PUBLIC_FIELDS: &[&str] =
    &["id", "firstname", "lastname", "email", "phone", "updatedAt"];

/// Allow-list of serialized field names that may leave the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProjection {
    fields: Vec<String>,
}

impl PublicProjection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Serialize `record` and keep only the allowed fields.
    ///
    /// Allowed fields the record does not have are skipped.
    pub fn project<T: Serialize>(&self, record: &T) -> Result<Value, serde_json::Error> {
        let Value::Object(mut source) = serde_json::to_value(record)? else {
            return Err(serde::ser::Error::custom(
                "record does not serialize to an object",
            ));
        };

        let mut projected = Map::new();
        for field in &self.fields {
            if let Some(value) = source.remove(field) {
                projected.insert(field.clone(), value);
            }
        }
        Ok(Value::Object(projected))
    }
}

impl Default for PublicProjection {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_FIELDS.iter().copied())
    }
}

/// Body of the list endpoint: `{ data, total, page, limit }`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResponsePayload {
    /// Projected records on the requested page
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
    /// Number of records across all pages
    pub total: u64,
    /// Page number (1-based) after normalization
    pub page: u64,
    /// Page size after normalization
    pub limit: u64,
}

/// Combine a fetched slice with its pagination view.
pub fn assemble<T: Serialize>(
    slice: Slice<T>,
    view: &PaginationView,
    projection: &PublicProjection,
) -> Result<ResponsePayload, serde_json::Error> {
    let data = slice
        .items
        .iter()
        .map(|item| projection.project(item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResponsePayload {
        data,
        total: slice.total,
        page: view.page,
        limit: view.limit,
    })
}
