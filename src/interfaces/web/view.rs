//! Display model consumed by the renderer.

use serde_json::Value;

use crate::application::{DirectoryPage, Navigation};

/// Table columns: header label and payload key, in display order.
pub const COLUMNS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("First name", "firstname"),
    ("Last name", "lastname"),
    ("Phone", "phone"),
    ("Email", "email"),
    ("Updated", "updatedAt"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Stable rendering key.
    pub key: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub rows: Vec<TableRow>,
    pub navigation: Navigation,
}

/// Either the full table with navigation, or a single notice. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageModel {
    Table(TableModel),
    Notice { status_code: u16 },
}

impl PageModel {
    /// Build the model from the listing outcome.
    ///
    /// `Err` carries the HTTP status of the failure. An empty page is shown as
    /// a notice with status 200, the same path as a load failure.
    pub fn from_outcome(outcome: Result<DirectoryPage, u16>, base_path: &str) -> Self {
        let page = match outcome {
            Ok(page) if !page.payload.data.is_empty() => page,
            Ok(_) => return PageModel::Notice { status_code: 200 },
            Err(status_code) => return PageModel::Notice { status_code },
        };

        let rows = page.payload.data.iter().map(table_row).collect();
        PageModel::Table(TableModel {
            rows,
            navigation: Navigation::from_view(&page.view, base_path),
        })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PageModel::Table(_) => 200,
            PageModel::Notice { status_code } => *status_code,
        }
    }
}

fn table_row(record: &Value) -> TableRow {
    TableRow {
        key: cell_text(record.get("id")),
        cells: COLUMNS
            .iter()
            .map(|(_, field)| cell_text(record.get(*field)))
            .collect(),
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ResponsePayload;
    use crate::shared::{PageRequest, PaginationPolicy};
    use serde_json::json;

    fn page(data: Vec<Value>, page: u64, total: u64) -> DirectoryPage {
        let request = PageRequest { page, limit: 10 };
        DirectoryPage {
            payload: ResponsePayload {
                data,
                total,
                page,
                limit: 10,
            },
            view: PaginationPolicy::default().view(&request, total),
        }
    }

    #[test]
    fn rows_follow_column_order() {
        let record = json!({
            "id": 7,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "phone": "+44",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        let model = PageModel::from_outcome(Ok(page(vec![record], 1, 1)), "/");

        let PageModel::Table(table) = model else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0].key, "7");
        assert_eq!(
            table.rows[0].cells,
            vec!["7", "Ada", "Lovelace", "+44", "ada@example.com", "2024-01-01T00:00:00Z"]
        );
        assert_eq!(table.navigation.pages.len(), 1);
    }

    #[test]
    fn missing_fields_render_blank() {
        let model = PageModel::from_outcome(Ok(page(vec![json!({"id": 1})], 1, 1)), "/");
        let PageModel::Table(table) = model else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0].cells[1], "");
    }

    #[test]
    fn empty_result_becomes_notice() {
        let model = PageModel::from_outcome(Ok(page(vec![], 1, 0)), "/");
        assert_eq!(model, PageModel::Notice { status_code: 200 });
    }

    #[test]
    fn out_of_range_page_becomes_notice() {
        let model = PageModel::from_outcome(Ok(page(vec![], 99, 50)), "/");
        assert_eq!(model.status_code(), 200);
        assert!(matches!(model, PageModel::Notice { .. }));
    }

    #[test]
    fn failure_keeps_status_code() {
        let model = PageModel::from_outcome(Err(503), "/");
        assert_eq!(model, PageModel::Notice { status_code: 503 });
    }
}
