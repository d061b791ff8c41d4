//! Geometry registry for hit-testing.
//!
//! Layout callbacks write the last measured rectangle of every visible
//! section row and every cell. All rectangles are measured against the
//! same ancestor view, so they share one coordinate space. Writes here
//! deliberately do not trigger a re-projection of the grid: frames change
//! on every scroll and resize, and only the hit-test reads them.
//!
//! The registry is last-write-wins. Entries are never invalidated; a
//! stale entry simply stops mattering once its `(section, row)` is no
//! longer part of the projection.

use crate::model::CellAddress;
use kurbo::{Point, Rect};
use std::collections::BTreeMap;

/// Key of a section row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionRowKey {
    pub section: usize,
    pub row: usize,
}

impl SectionRowKey {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// Recorded frame of a section row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRowEntry {
    pub key: SectionRowKey,
    pub frame: Rect,
}

/// Recorded frame of a cell within a section row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEntry {
    pub column: usize,
    pub frame: Rect,
}

/// Cache of last-measured rectangles.
#[derive(Debug, Clone, Default)]
pub struct GeometryRegistry {
    rows: BTreeMap<SectionRowKey, SectionRowEntry>,
    cells: BTreeMap<SectionRowKey, BTreeMap<usize, CellEntry>>,
    /// Cell currently highlighted as drop target; its frame is frozen.
    hover_exclusion: Option<CellAddress>,
    grid_origin: Option<Point>,
}

/// Build a frame from layout values.
pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// Vertical hit-test: lower bound exclusive, upper bound inclusive.
pub fn contains_y(frame: &Rect, y: f64) -> bool {
    frame.y0 < y && y <= frame.y1
}

/// Horizontal hit-test: both bounds inclusive.
pub fn contains_x(frame: &Rect, x: f64) -> bool {
    frame.x0 <= x && x <= frame.x1
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the frame of a section row.
    ///
    /// The first frame recorded for section 0, row 0 fixes the grid origin.
    pub fn record_section_frame(&mut self, section: usize, row: usize, frame: Rect) {
        let key = SectionRowKey::new(section, row);
        if section == 0 && row == 0 && self.grid_origin.is_none() {
            self.grid_origin = Some(frame.origin());
            log::debug!("Grid origin established at {:?}", frame.origin());
        }
        self.rows.insert(key, SectionRowEntry { key, frame });
    }

    /// Store the frame of a cell, unless that cell is the hovered drop
    /// target. Returns whether the frame was stored.
    pub fn record_cell_frame(
        &mut self,
        section: usize,
        row: usize,
        column: usize,
        frame: Rect,
    ) -> bool {
        if self.hover_exclusion == Some(CellAddress::new(section, column, row)) {
            return false;
        }
        self.cells
            .entry(SectionRowKey::new(section, row))
            .or_default()
            .insert(column, CellEntry { column, frame });
        true
    }

    /// First section row whose frame vertically contains `y`.
    pub fn find_section_row_at(&self, y: f64) -> Option<&SectionRowEntry> {
        self.rows.values().find(|entry| contains_y(&entry.frame, y))
    }

    /// First cell of a section row whose frame horizontally contains `x`.
    pub fn find_cell_at(&self, key: SectionRowKey, x: f64) -> Option<&CellEntry> {
        self.cells
            .get(&key)?
            .values()
            .find(|entry| contains_x(&entry.frame, x))
    }

    /// Recorded frame of a section row.
    pub fn section_frame(&self, section: usize, row: usize) -> Option<Rect> {
        self.rows
            .get(&SectionRowKey::new(section, row))
            .map(|entry| entry.frame)
    }

    /// Recorded frame of a cell.
    pub fn cell_frame(&self, cell: CellAddress) -> Option<Rect> {
        self.cells
            .get(&SectionRowKey::new(cell.section, cell.row))?
            .get(&cell.column)
            .map(|entry| entry.frame)
    }

    /// Drop every row and its cells for which `keep` returns false.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(SectionRowKey) -> bool) {
        let before = self.rows.len();
        self.rows.retain(|key, _| keep(*key));
        self.cells.retain(|key, _| self.rows.contains_key(key));
        if self.rows.len() != before {
            log::debug!("Pruned {} stale section rows", before - self.rows.len());
        }
    }

    /// Freeze the geometry of the hovered drop target.
    pub fn set_hover_exclusion(&mut self, cell: Option<CellAddress>) {
        self.hover_exclusion = cell;
    }

    pub fn hover_exclusion(&self) -> Option<CellAddress> {
        self.hover_exclusion
    }

    /// Drop the hover freeze; called when a drag ends.
    pub fn clear_hover_exclusion(&mut self) {
        self.hover_exclusion = None;
    }

    /// Top-left of section 0, row 0 as first measured.
    pub fn grid_origin(&self) -> Option<Point> {
        self.grid_origin
    }

    pub fn section_row_count(&self) -> usize {
        self.rows.len()
    }
}
