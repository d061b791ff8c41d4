//! Headless layout: every cell gets the same size, sections stack
//! vertically below a header band.

use kurbo::{Rect, Size};
use swimlane_core::Swimlane;

/// Uniform cell layout in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformLayout {
    pub cell_width: f64,
    pub cell_height: f64,
    /// Height of each section header band.
    pub header_height: f64,
}

impl Default for UniformLayout {
    fn default() -> Self {
        Self {
            cell_width: 200.0,
            cell_height: 80.0,
            header_height: 32.0,
        }
    }
}

impl UniformLayout {
    /// Measure every materialized row and cell of `board` and report the
    /// frames to it. Returns the content size.
    pub fn apply<T: Clone>(&self, board: &mut Swimlane<T>) -> Size {
        let cell_width = board.config().column_width.unwrap_or(self.cell_width);
        let columns = board.grid().column_count;
        let width = cell_width * columns as f64;

        let rows: Vec<(usize, usize)> = board
            .grid()
            .sections
            .iter()
            .map(|section| (section.index, section.rows.len()))
            .collect();

        let mut y = 0.0;
        for (section, row_count) in rows {
            y += self.header_height;
            for row in 0..row_count {
                board.on_section_layout(section, row, Some(Rect::new(0.0, y, width, y + self.cell_height)));
                for column in 0..columns {
                    let x = column as f64 * cell_width;
                    board.on_cell_layout(
                        section,
                        row,
                        column,
                        Some(Rect::new(x, y, x + cell_width, y + self.cell_height)),
                    );
                }
                y += self.cell_height;
            }
        }
        log::debug!("Laid out board at {}x{}", width, y);
        Size::new(width, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swimlane_core::{CellAddress, Column, ItemInput, Section, SwimlaneConfig};

    #[test]
    fn test_frames_stack_below_headers() {
        let mut board = Swimlane::new(
            vec![Column::new(0, "Todo"), Column::new(1, "Done")],
            vec![Section::new(0, "A").expanded(true), Section::new(1, "B").expanded(true)],
            vec![ItemInput::new(0, 0, 1u32).with_key("one")],
            SwimlaneConfig::default(),
        );
        let size = UniformLayout::default().apply(&mut board);

        // Two rows per section, plus a header each.
        assert_eq!(size, Size::new(400.0, 32.0 * 2.0 + 80.0 * 4.0));
        assert_eq!(
            board.geometry().cell_frame(CellAddress::new(1, 1, 0)),
            Some(Rect::new(200.0, 224.0, 400.0, 304.0))
        );
        assert_eq!(board.geometry().grid_origin(), Some(kurbo::Point::new(0.0, 32.0)));
    }

    #[test]
    fn test_configured_column_width_wins() {
        let config = SwimlaneConfig {
            column_width: Some(120.0),
            ..SwimlaneConfig::default()
        };
        let mut board: Swimlane<u32> = Swimlane::new(
            vec![Column::new(0, "Todo")],
            vec![Section::new(0, "A")],
            Vec::new(),
            config,
        );
        let size = UniformLayout::default().apply(&mut board);
        // Collapsed: header only.
        assert_eq!(size, Size::new(120.0, 32.0));
        assert_eq!(board.geometry().section_row_count(), 0);
    }
}
