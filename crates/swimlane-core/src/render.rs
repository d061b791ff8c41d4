//! Render strategy and the rendered board tree.
//!
//! The engine does not draw anything itself. A consumer implements
//! [`RenderStrategy`] once and hands a single reference to
//! [`render_board`], which walks the projection and asks the strategy for
//! every header and cell.

use crate::model::{CellAddress, Column, GridModel, GridSection, Item};

/// Render hooks for a board.
pub trait RenderStrategy<T> {
    /// Visual description produced for headers and cells.
    type Output;
    /// Style attached to cells during a drag.
    type Style;

    /// Render a populated cell.
    fn render_item(&self, item: &Item<T>, column: usize, section: usize, row: usize) -> Self::Output;

    /// Render an empty cell.
    fn empty_item(&self, column: usize, section: usize, row: usize) -> Self::Output;

    /// Render a column header.
    fn render_column_item(&self, column: &Column, index: usize) -> Self::Output;

    /// Render a section header.
    fn render_section_header(&self, section: &GridSection<T>) -> Self::Output;

    /// Style for cells while a drag is in progress.
    fn dragging_area_style(&self, _column: usize, _section: usize, _row: usize) -> Option<Self::Style> {
        None
    }

    /// Style for the hovered drop target.
    fn hover_style(&self) -> Option<Self::Style> {
        None
    }
}

/// A rendered cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell<O, S> {
    pub address: CellAddress,
    pub content: O,
    pub style: Option<S>,
    pub hovered: bool,
    /// The cell the current drag started from.
    pub is_origin: bool,
}

/// A rendered section.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection<O, S> {
    pub index: usize,
    pub header: O,
    pub expanded: bool,
    pub rows: Vec<Vec<RenderedCell<O, S>>>,
}

/// A rendered board.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBoard<O, S> {
    /// Column headers, shown once above the first section.
    pub column_headers: Vec<O>,
    pub sections: Vec<RenderedSection<O, S>>,
}

/// Drag state the renderer needs to decorate cells.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragDecoration {
    pub dragging: bool,
    pub origin: Option<CellAddress>,
    pub hovered: Option<CellAddress>,
}

/// Render the whole board through `strategy`.
pub fn render_board<T, R>(
    grid: &GridModel<T>,
    columns: &[Column],
    strategy: &R,
    decoration: DragDecoration,
) -> RenderedBoard<R::Output, R::Style>
where
    R: RenderStrategy<T>,
{
    let column_headers = columns
        .iter()
        .enumerate()
        .map(|(index, column)| strategy.render_column_item(column, index))
        .collect();

    let sections = grid
        .sections
        .iter()
        .map(|section| RenderedSection {
            index: section.index,
            header: strategy.render_section_header(section),
            expanded: section.expanded,
            rows: section
                .rows
                .iter()
                .map(|row| {
                    row.items
                        .iter()
                        .enumerate()
                        .map(|(column, slot)| {
                            let address = CellAddress::new(section.index, column, row.row);
                            let content = match slot {
                                Some(item) => strategy.render_item(item, column, section.index, row.row),
                                None => strategy.empty_item(column, section.index, row.row),
                            };
                            let hovered = decoration.hovered == Some(address);
                            let style = if hovered {
                                strategy.hover_style()
                            } else if decoration.dragging {
                                strategy.dragging_area_style(column, section.index, row.row)
                            } else {
                                None
                            };
                            RenderedCell {
                                address,
                                content,
                                style,
                                hovered,
                                is_origin: decoration.origin == Some(address),
                            }
                        })
                        .collect()
                })
                .collect(),
        })
        .collect();

    RenderedBoard {
        column_headers,
        sections,
    }
}
