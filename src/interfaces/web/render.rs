//! HTML rendering of the directory page.

use std::fmt::Write;

use super::view::{PageModel, TableModel, COLUMNS};
use crate::application::directory::NavControl;

const TITLE: &str = "Users";

pub fn render_page(model: &PageModel) -> String {
    let body = match model {
        PageModel::Table(table) => render_table(table),
        PageModel::Notice { status_code } => format!(
            "<div class=\"alert alert-danger\" role=\"alert\">Error {} while loading data</div>",
            status_code
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n<main class=\"container\">\n{body}\n</main>\n</body>\n</html>\n",
        title = TITLE,
        body = body,
    )
}

fn render_table(table: &TableModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h1>{}</h1>", TITLE);
    out.push_str("<table class=\"table table-striped table-bordered\">\n<thead><tr>");
    for (label, _) in COLUMNS {
        let _ = write!(out, "<th>{}</th>", escape(label));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        let _ = write!(out, "<tr data-key=\"{}\">", escape(&row.key));
        for cell in &row.cells {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");

    let nav = &table.navigation;
    out.push_str("<ul class=\"pagination\">\n");
    out.push_str(&control("&laquo;", &nav.first));
    out.push_str(&control("&lsaquo;", &nav.prev));
    for link in &nav.pages {
        let class = if link.active { "page-item active" } else { "page-item" };
        let _ = writeln!(
            out,
            "<li class=\"{}\"><a class=\"page-link\" href=\"{}\">{}</a></li>",
            class,
            escape(&link.href),
            link.page
        );
    }
    out.push_str(&control("&rsaquo;", &nav.next));
    out.push_str(&control("&raquo;", &nav.last));
    out.push_str("</ul>");
    out
}

fn control(symbol: &str, ctl: &NavControl) -> String {
    if ctl.disabled {
        format!(
            "<li class=\"page-item disabled\"><span class=\"page-link\">{}</span></li>\n",
            symbol
        )
    } else {
        format!(
            "<li class=\"page-item\"><a class=\"page-link\" href=\"{}\">{}</a></li>\n",
            escape(&ctl.href),
            symbol
        )
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Navigation;
    use crate::interfaces::web::view::TableRow;
    use crate::shared::{PageRequest, PaginationPolicy};

    fn table(page: u64, total: u64) -> TableModel {
        let view = PaginationPolicy::default().view(&PageRequest { page, limit: 10 }, total);
        TableModel {
            rows: vec![TableRow {
                key: "1".into(),
                cells: vec!["1".into(), "<b>Bob</b>".into()],
            }],
            navigation: Navigation::from_view(&view, "/"),
        }
    }

    #[test]
    fn notice_has_no_table() {
        let html = render_page(&PageModel::Notice { status_code: 500 });
        assert!(html.contains("Error 500 while loading data"));
        assert!(!html.contains("<table"));
        assert!(!html.contains("pagination"));
    }

    #[test]
    fn cells_are_escaped() {
        let html = render_page(&PageModel::Table(table(1, 5)));
        assert!(html.contains("&lt;b&gt;Bob&lt;/b&gt;"));
        assert!(!html.contains("<b>Bob</b>"));
    }

    #[test]
    fn active_and_disabled_controls() {
        let html = render_page(&PageModel::Table(table(2, 30)));
        assert!(html.contains(
            "<li class=\"page-item active\"><a class=\"page-link\" href=\"/?page=2&amp;limit=10\">2</a></li>"
        ));
        assert!(!html.contains("page-item disabled"));

        let html = render_page(&PageModel::Table(table(1, 5)));
        assert_eq!(html.matches("page-item disabled").count(), 4);
    }
}
