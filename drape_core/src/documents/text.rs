//! Plain-text rendering for previews and the terminal.

use std::fmt::Write;

use super::layout::{DocumentView, Line};

const RULE: &str = "----------------------------------------";
const DOUBLE_RULE: &str = "========================================";

/// Render a document view as plain text.
pub fn render_text(view: &DocumentView) -> String {
    let mut out = String::new();

    if !view.shop_name.is_empty() {
        let _ = writeln!(out, "{}", view.shop_name);
    }
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", DOUBLE_RULE);
    write_lines(&mut out, &view.header, "");

    for section in &view.sections {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}", section.heading);
        write_lines(&mut out, &section.lines, "  ");
        if !section.pricing.is_empty() {
            let _ = writeln!(out, "  -- 計價項目 --");
            write_lines(&mut out, &section.pricing, "  ");
        }
    }

    let _ = writeln!(out, "{}", RULE);
    if !view.closing.is_empty() {
        if let Some(heading) = &view.closing_heading {
            let _ = writeln!(out, "{}", heading);
        }
        write_lines(&mut out, &view.closing, "");
    }

    if let Some(total) = &view.total {
        let _ = writeln!(out, "{}", DOUBLE_RULE);
        let _ = writeln!(out, "{}: {}", total.label, total.value);
    }

    out
}

fn write_lines(out: &mut String, lines: &[Line], indent: &str) {
    for line in lines {
        let _ = writeln!(out, "{}{}: {}", indent, line.label, line.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentKind;
    use crate::project::Project;
    use crate::window::WindowField;

    #[test]
    fn test_quote_text() {
        let mut project = Project::new("Site");
        project.settings.shop_name = "晴光窗簾".to_string();
        project.set_window_field(1, WindowField::InstallMethod, "ceiling").unwrap();
        project.set_window_field(1, WindowField::CeilingMountCost, "1250").unwrap();

        let text = render_text(&project.document(DocumentKind::Quote));
        assert!(text.starts_with("晴光窗簾\n報價單 - Site\n"));
        assert!(text.contains("窗戶 1 (未指定空間)"));
        assert!(text.contains("  -- 計價項目 --"));
        assert!(text.contains("  安裝加價: $1,250"));
        assert!(text.ends_with("總計金額: $1,250\n"));
    }

    #[test]
    fn test_order_text_has_no_price_rows() {
        let project = Project::new("Site");
        let text = render_text(&project.document(DocumentKind::FactoryOrder));
        assert!(!text.contains("計價項目"));
        assert!(!text.contains("總計金額"));
        assert!(!text.contains('$'));
    }
}
