//! The swimlane board: data, projection, geometry and the drag gesture
//! wired together.
//!
//! [`Swimlane`] is the one object a host hands its events to. Layout
//! callbacks feed the geometry registry, the gesture source feeds the drag
//! session, the scroll container feeds the autoscroller, and a finished
//! drag runs the reorder step, rebuilds the projection and notifies the
//! move listeners. None of the gesture-facing methods fail: stale geometry,
//! misses and rejected presses are logged and fall back to "no hover" or
//! "no move".

use crate::autoscroll::{AutoScroller, Axis, ScrollSink, ScrollUpdate};
use crate::config::SwimlaneConfig;
use crate::error::{SwimlaneError, SwimlaneResult};
use crate::geometry::GeometryRegistry;
use crate::model::{CellAddress, Column, GridModel, Item, ItemId, ItemInput, Section, ingest};
use crate::render::{DragDecoration, RenderStrategy, RenderedBoard, render_board};
use crate::reorder::{MoveEvent, reorder};
use crate::session::{DragOrigin, DragSession, TargetPosition};
use kurbo::{Point, Rect, Vec2};
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Listener for committed moves.
pub type MoveListener<T> = Box<dyn FnMut(&MoveEvent<T>)>;

/// The floating copy of the dragged item.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOverlay<T> {
    pub item: Item<T>,
    pub origin: CellAddress,
    /// Frame of the origin cell when the drag started.
    pub start_frame: Rect,
    /// Translation since the drag started.
    pub offset: Vec2,
}

impl<T> DragOverlay<T> {
    /// Where the overlay is drawn now.
    pub fn frame(&self) -> Rect {
        self.start_frame + self.offset
    }
}

/// A drag-and-drop swimlane board.
pub struct Swimlane<T> {
    config: SwimlaneConfig,
    columns: Vec<Column>,
    sections: Vec<Section>,
    items: Vec<Item<T>>,
    grid: GridModel<T>,
    geometry: GeometryRegistry,
    session: DragSession,
    scroller: AutoScroller,
    viewport_origin: Option<Point>,
    /// Last pointer seen during the active drag.
    last_pointer: Option<Point>,
    listeners: Vec<MoveListener<T>>,
}

impl<T: Clone> Swimlane<T> {
    /// Create a board. An invalid config is replaced by the defaults.
    pub fn new(
        columns: Vec<Column>,
        sections: Vec<Section>,
        data: Vec<ItemInput<T>>,
        config: SwimlaneConfig,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{}, falling back to the default configuration", e);
                SwimlaneConfig::default()
            }
        };
        if columns.is_empty() {
            log::warn!("Board has no columns, nothing will be draggable");
        }
        let items = ingest(data);
        let grid = GridModel::project(&items, &columns, &sections, config.empty_rows);
        Self {
            session: DragSession::new(
                config.drag_trigger,
                Duration::from_millis(config.long_press_delay_ms),
            ),
            scroller: AutoScroller::from_config(&config),
            config,
            columns,
            sections,
            items,
            grid,
            geometry: GeometryRegistry::new(),
            viewport_origin: None,
            last_pointer: None,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &SwimlaneConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: SwimlaneConfig) -> SwimlaneResult<()> {
        config.validate()?;
        self.session.set_trigger(
            config.drag_trigger,
            Duration::from_millis(config.long_press_delay_ms),
        );
        self.scroller.configure(&config);
        self.config = config;
        self.rebuild();
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The flat item list in board order.
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Look an item up by id.
    pub fn item(&self, id: &ItemId) -> SwimlaneResult<&Item<T>> {
        self.items
            .iter()
            .find(|item| item.id == *id)
            .ok_or_else(|| SwimlaneError::ItemNotFound(id.clone()))
    }

    /// The item shown in `cell`.
    pub fn item_at(&self, cell: CellAddress) -> SwimlaneResult<&Item<T>> {
        self.grid.item_at(cell).ok_or(SwimlaneError::EmptyCell {
            section: cell.section,
            column: cell.column,
            row: cell.row,
        })
    }

    /// The current projection.
    pub fn grid(&self) -> &GridModel<T> {
        &self.grid
    }

    pub fn geometry(&self) -> &GeometryRegistry {
        &self.geometry
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Replace the items. Keyed items keep their identity.
    pub fn set_data(&mut self, data: Vec<ItemInput<T>>) {
        self.items = ingest(data);
        self.rebuild();
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
        self.rebuild();
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.rebuild();
    }

    /// Expand or collapse a section, as a header press does.
    pub fn toggle_section(&mut self, index: usize) -> bool {
        let Some(section) = self.sections.get_mut(index) else {
            return false;
        };
        section.expanded = !section.expanded;
        log::debug!(
            "Section {} {}",
            index,
            if section.expanded { "expanded" } else { "collapsed" }
        );
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.grid = GridModel::project(
            &self.items,
            &self.columns,
            &self.sections,
            self.config.empty_rows,
        );
        let grid = &self.grid;
        self.geometry
            .retain_rows(|key| grid.has_row(key.section, key.row));
        if self.session.is_dragging() {
            self.update_hover();
        }
    }

    /// Record a measured section row. `None` means measuring failed and
    /// is retried on the next layout pass.
    pub fn on_section_layout(&mut self, section: usize, row: usize, frame: Option<Rect>) {
        let Some(frame) = frame else {
            log::debug!("No geometry yet for section {} row {}", section, row);
            return;
        };
        if !self.grid.has_row(section, row) {
            log::debug!("Ignoring frame for unmounted section {} row {}", section, row);
            return;
        }
        self.geometry.record_section_frame(section, row, frame);
    }

    /// Record a measured cell.
    pub fn on_cell_layout(&mut self, section: usize, row: usize, column: usize, frame: Option<Rect>) {
        let Some(frame) = frame else {
            log::debug!("No geometry yet for cell ({}, {}, {})", section, column, row);
            return;
        };
        self.geometry.record_cell_frame(section, row, column, frame);
    }

    /// Where the viewport sits in the coordinate space of absolute pointer
    /// positions. Defaults to the grid origin.
    pub fn set_viewport_origin(&mut self, origin: Point) {
        self.viewport_origin = Some(origin);
    }

    /// A long press or pan began on `cell`, pressed at its centre. Returns
    /// whether a drag was armed.
    pub fn on_drag_trigger(&mut self, cell: CellAddress, now: Instant) -> bool {
        self.arm(cell, None, now)
    }

    /// Like [`Swimlane::on_drag_trigger`], with the press at `grab` relative
    /// to the cell's top-left corner. Points outside the cell are clamped
    /// onto its edge.
    pub fn on_drag_trigger_at(&mut self, cell: CellAddress, grab: Vec2, now: Instant) -> bool {
        self.arm(cell, Some(grab), now)
    }

    fn arm(&mut self, cell: CellAddress, grab: Option<Vec2>, now: Instant) -> bool {
        let Some(item) = self.grid.item_at(cell) else {
            log::debug!("Press on empty cell {:?} ignored", cell);
            return false;
        };
        let Some(start_frame) = self.geometry.cell_frame(cell) else {
            log::debug!("Press on unmeasured cell {:?} ignored", cell);
            return false;
        };
        let grab = match grab {
            Some(grab) => Vec2::new(
                grab.x.clamp(0.0, start_frame.width()),
                grab.y.clamp(0.0, start_frame.height()),
            ),
            None => start_frame.center() - start_frame.origin(),
        };
        let origin = DragOrigin {
            cell,
            item: item.id.clone(),
            start_frame,
            grab,
        };
        match self.session.arm(origin, now) {
            Ok(()) => {
                self.poll_activation(now);
                true
            }
            Err(e) => {
                log::debug!("Press on {:?} ignored: {}", cell, e);
                false
            }
        }
    }

    /// The gesture source recognised a pan.
    pub fn on_pan_start(&mut self, now: Instant) -> bool {
        let activated = self.session.pan_start(now, self.scroller.offsets());
        if activated {
            self.update_hover();
        }
        activated
    }

    /// A gesture update. `translation` is the travel since the gesture began.
    pub fn on_pointer_move(&mut self, translation: Vec2, absolute: Point, now: Instant) {
        if self.session.is_armed() {
            self.poll_activation(now);
            if self.session.is_armed() {
                self.on_pan_start(now);
            }
        }
        if !self.session.pointer_move(translation, absolute) {
            return;
        }
        self.last_pointer = Some(absolute);
        let pointer = self.viewport_pointer(absolute);
        self.scroller.evaluate(pointer, now);
        self.update_hover();
    }

    /// Advance timed state: long-press arming and autoscroll. Changed
    /// offsets are mirrored into `sink` while dragging.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn ScrollSink) -> ScrollUpdate {
        self.poll_activation(now);
        if !self.session.is_dragging() {
            return ScrollUpdate::default();
        }
        let update = self.scroller.tick(now);
        if !update.is_empty() {
            update.apply(sink);
            self.update_hover();
        }
        // A pointer held still at an edge keeps scrolling.
        if let Some(pointer) = self.last_pointer {
            let pointer = self.viewport_pointer(pointer);
            self.scroller.evaluate(pointer, now);
        }
        update
    }

    /// The gesture ended. Commits the move, if any.
    pub fn on_drag_end(&mut self) -> Option<MoveEvent<T>> {
        let commit = self.session.finish();
        self.last_pointer = None;
        self.scroller.stop();
        self.geometry.clear_hover_exclusion();

        let commit = commit?;
        let Some(target) = commit.target else {
            log::debug!("Drag from {:?} ended without a target", commit.origin.cell);
            return None;
        };
        let event = reorder(&mut self.items, &commit.origin.item, commit.origin.cell, target.cell)?;
        self.rebuild();
        for listener in &mut self.listeners {
            listener(&event);
        }
        Some(event)
    }

    /// The gesture was cancelled or failed; handled like an end.
    pub fn on_drag_cancel(&mut self) -> Option<MoveEvent<T>> {
        self.on_drag_end()
    }

    /// A scroll event from the container.
    pub fn on_scroll(&mut self, axis: Axis, offset: f64, content: f64, viewport: f64) {
        self.scroller.axis_mut(axis).on_scroll(offset, content, viewport);
        if self.session.is_dragging() {
            self.update_hover();
        }
    }

    pub fn on_content_size_change(&mut self, axis: Axis, content: f64) {
        self.scroller.axis_mut(axis).on_content_size_change(content);
    }

    /// Whether the container may scroll natively. Off while dragging.
    pub fn scroll_enabled(&self) -> bool {
        !self.session.is_dragging()
    }

    pub fn scroll_offsets(&self) -> Vec2 {
        self.scroller.offsets()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Cell currently highlighted as drop target.
    pub fn hovered_cell(&self) -> Option<CellAddress> {
        self.session.target().map(|target| target.cell)
    }

    /// The floating item to draw while dragging.
    pub fn drag_overlay(&self) -> Option<DragOverlay<T>> {
        if !self.session.is_dragging() {
            return None;
        }
        let origin = self.session.origin()?;
        let item = self.item(&origin.item).ok()?;
        Some(DragOverlay {
            item: item.clone(),
            origin: origin.cell,
            start_frame: origin.start_frame,
            offset: self.session.offset(),
        })
    }

    /// Register a listener for committed moves.
    pub fn on_item_moved(&mut self, listener: impl FnMut(&MoveEvent<T>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Render the board through `strategy`.
    pub fn render<R: RenderStrategy<T>>(&self, strategy: &R) -> RenderedBoard<R::Output, R::Style> {
        let decoration = DragDecoration {
            dragging: self.session.is_dragging(),
            origin: self
                .session
                .origin()
                .filter(|_| self.session.is_dragging())
                .map(|origin| origin.cell),
            hovered: self.hovered_cell(),
        };
        render_board(&self.grid, &self.columns, strategy, decoration)
    }

    fn poll_activation(&mut self, now: Instant) {
        if self.session.poll(now, self.scroller.offsets()) {
            self.update_hover();
        }
    }

    fn viewport_pointer(&self, absolute: Point) -> Point {
        let origin = self
            .viewport_origin
            .or(self.geometry.grid_origin())
            .unwrap_or(Point::ZERO);
        absolute - origin.to_vec2()
    }

    /// Pointer position in the coordinate space of the recorded frames:
    /// the press point carried along by the drag and by autoscroll.
    fn grid_pointer(&self) -> Option<Point> {
        let origin = self.session.origin()?;
        let baseline = self.session.scroll_baseline()?;
        Some(
            origin.start_frame.origin()
                + origin.grab
                + self.session.offset()
                + (self.scroller.offsets() - baseline)
                + self.config.enter_cursor_offset,
        )
    }

    fn resolve_target(&self) -> Option<TargetPosition> {
        let pointer = self.grid_pointer()?;
        let row = self.geometry.find_section_row_at(pointer.y)?;
        if !self.grid.has_row(row.key.section, row.key.row) {
            return None;
        }
        let cell = self.geometry.find_cell_at(row.key, pointer.x)?;
        let column = self.columns.get(cell.column)?;
        if column.disabled {
            return None;
        }
        let address = CellAddress::new(row.key.section, cell.column, row.key.row);
        Some(TargetPosition {
            cell: address,
            id: self.grid.item_at(address).map(|item| item.id.clone()),
        })
    }

    fn update_hover(&mut self) {
        let target = self.resolve_target();
        self.geometry.set_hover_exclusion(target.as_ref().map(|t| t.cell));
        self.session.set_target(target);
    }
}
