//! Navigation controls derived from a pagination view.

use serde::Serialize;

use crate::shared::PaginationView;

/// A first/prev/next/last control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavControl {
    pub page: u64,
    pub href: String,
    pub disabled: bool,
}

/// A numbered page link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: u64,
    pub href: String,
    pub active: bool,
}

/// Everything a renderer needs to draw the page bar.
///
/// Recomputed from the view on every request; nothing is remembered between
/// calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub first: NavControl,
    pub prev: NavControl,
    pub pages: Vec<PageLink>,
    pub next: NavControl,
    pub last: NavControl,
}

impl Navigation {
    /// Build controls whose links point at `base_path?page=N&limit=L`.
    pub fn from_view(view: &PaginationView, base_path: &str) -> Self {
        let href = |page: u64| format!("{}?page={}&limit={}", base_path, page, view.limit);
        let control = |page: u64, disabled: bool| NavControl {
            page,
            href: href(page),
            disabled,
        };

        Self {
            first: control(1, view.is_first),
            prev: control(view.page.saturating_sub(1).max(1), view.is_first),
            pages: view
                .visible_page_numbers
                .iter()
                .map(|&page| PageLink {
                    page,
                    href: href(page),
                    active: page == view.page,
                })
                .collect(),
            next: control(view.page.saturating_add(1), view.is_last),
            last: control(view.total_pages.max(1), view.is_last),
        }
    }
}
