//! Plain-text rendering of a board, for terminals and snapshots.

use serde_json::Value;
use swimlane_core::render::{RenderStrategy, RenderedBoard};
use swimlane_core::{Column, GridSection, Item};

const CELL_WIDTH: usize = 12;

/// Cell decoration while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    DropArea,
    Hover,
}

/// Renders items by their JSON payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("title")
            .or_else(|| map.get("name"))
            .map(label)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

impl RenderStrategy<Value> for TextRenderer {
    type Output = String;
    type Style = CellMark;

    fn render_item(&self, item: &Item<Value>, _column: usize, _section: usize, _row: usize) -> String {
        label(&item.data)
    }

    fn empty_item(&self, _column: usize, _section: usize, _row: usize) -> String {
        String::new()
    }

    fn render_column_item(&self, column: &Column, _index: usize) -> String {
        if column.disabled {
            format!("({})", column.title)
        } else {
            column.title.clone()
        }
    }

    fn render_section_header(&self, section: &GridSection<Value>) -> String {
        let marker = if section.expanded { "v" } else { ">" };
        format!("{} {}", marker, section.title)
    }

    fn dragging_area_style(&self, _column: usize, _section: usize, _row: usize) -> Option<CellMark> {
        Some(CellMark::DropArea)
    }

    fn hover_style(&self) -> Option<CellMark> {
        Some(CellMark::Hover)
    }
}

fn fit(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH).collect();
    format!("{:<width$}", clipped, width = CELL_WIDTH)
}

/// Lay a rendered board out as lines of text. The hovered cell is wrapped
/// in `>..<`, the rest of the drop area in `:..:`.
pub fn format_board(board: &RenderedBoard<String, CellMark>) -> String {
    let mut lines = Vec::new();
    let header: Vec<String> = board
        .column_headers
        .iter()
        .map(|title| format!(" {} ", fit(title)))
        .collect();
    lines.push(header.concat().trim_end().to_string());

    for section in &board.sections {
        lines.push(section.header.clone());
        for row in &section.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| {
                    let (open, close) = match cell.style {
                        Some(CellMark::Hover) => ('>', '<'),
                        Some(CellMark::DropArea) => (':', ':'),
                        None => ('[', ']'),
                    };
                    format!("{}{}{}", open, fit(&cell.content), close)
                })
                .collect();
            lines.push(cells.concat());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swimlane_core::{ItemInput, Section, Swimlane, SwimlaneConfig};

    #[test]
    fn test_labels() {
        assert_eq!(label(&json!("plain")), "plain");
        assert_eq!(label(&json!({ "title": "Ship", "points": 3 })), "Ship");
        assert_eq!(label(&json!(42)), "42");
    }

    #[test]
    fn test_format_idle_board() {
        let board = Swimlane::new(
            vec![Column::new(0, "Todo"), Column::new(1, "Done")],
            vec![Section::new(0, "Team").expanded(true), Section::new(1, "Later")],
            vec![ItemInput::new(1, 0, json!("write docs"))],
            SwimlaneConfig::default(),
        );
        let text = format_board(&board.render(&TextRenderer));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], " Todo          Done");
        assert_eq!(lines[1], "v Team");
        assert_eq!(lines[2], "[            ][write docs  ]");
        assert_eq!(lines[4], "> Later");
        assert_eq!(lines.len(), 5);
    }
}
