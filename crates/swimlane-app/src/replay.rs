//! Replays a scenario against a board with a virtual clock.

use crate::layout::UniformLayout;
use crate::scenario::{Scenario, Step, Viewport};
use crate::text::{TextRenderer, format_board};
use kurbo::{Point, Size, Vec2};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use swimlane_core::{Axis, CellAddress, Instant, MoveEvent, ScrollSink, Swimlane};

/// Time between ticks while waiting.
pub const FRAME: Duration = Duration::from_millis(16);

/// Collects the offsets the board pushes to the container.
#[derive(Debug, Default)]
struct ContainerSink {
    calls: Vec<(Axis, f64)>,
}

impl ScrollSink for ContainerSink {
    fn scroll_to(&mut self, axis: Axis, offset: f64) {
        self.calls.push((axis, offset));
    }
}

/// Items of one non-empty bucket after the replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSnapshot {
    pub section: usize,
    pub column: usize,
    pub items: Vec<Value>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub moves: Vec<MoveEvent<Value>>,
    pub buckets: Vec<BucketSnapshot>,
    pub scroll: Vec2,
    /// Cells hovered as drop target, in the order they lit up.
    pub hover_trail: Vec<CellAddress>,
    /// Text rendering of the final board.
    pub board: String,
}

/// A board driven by scripted steps.
pub struct Replay {
    board: Swimlane<Value>,
    layout: UniformLayout,
    viewport: Viewport,
    content: Size,
    clock: Instant,
    press_point: Option<Point>,
    moves: Rc<RefCell<Vec<MoveEvent<Value>>>>,
    hover_trail: Arc<Mutex<Vec<CellAddress>>>,
}

impl Replay {
    pub fn new(scenario: &Scenario) -> Self {
        Self::with_layout(scenario, UniformLayout::default())
    }

    pub fn with_layout(scenario: &Scenario, layout: UniformLayout) -> Self {
        let contents = scenario.board.clone();
        let mut board = Swimlane::new(contents.columns, contents.sections, contents.items, contents.config);
        board.set_viewport_origin(Point::ZERO);

        let moves: Rc<RefCell<Vec<MoveEvent<Value>>>> = Rc::default();
        let sink = Rc::clone(&moves);
        board.on_item_moved(move |event| sink.borrow_mut().push(event.clone()));

        let hover_trail: Arc<Mutex<Vec<CellAddress>>> = Arc::default();
        let trail = Arc::clone(&hover_trail);
        board.session().target_handle().subscribe(move |target| {
            if let Some(target) = target {
                let mut trail = trail.lock();
                if trail.last() != Some(&target.cell) {
                    trail.push(target.cell);
                }
            }
        });

        let mut replay = Self {
            board,
            layout,
            viewport: scenario.viewport,
            content: Size::ZERO,
            clock: Instant::now(),
            press_point: None,
            moves,
            hover_trail,
        };
        replay.relayout();
        replay
            .board
            .on_scroll(Axis::Horizontal, 0.0, replay.content.width, replay.viewport.width);
        replay
            .board
            .on_scroll(Axis::Vertical, 0.0, replay.content.height, replay.viewport.height);
        replay
    }

    /// Replay every step of `scenario` and report the result.
    pub fn run(scenario: &Scenario) -> ReplayReport {
        let mut replay = Self::new(scenario);
        for step in &scenario.steps {
            replay.step(step);
        }
        replay.report()
    }

    pub fn board(&self) -> &Swimlane<Value> {
        &self.board
    }

    pub fn clock(&self) -> Instant {
        self.clock
    }

    pub fn step(&mut self, step: &Step) {
        log::trace!("Step {:?}", step);
        match *step {
            Step::Press {
                section,
                column,
                row,
            } => self.press(CellAddress::new(section, column, row)),
            Step::PanStart => {
                self.board.on_pan_start(self.clock);
            }
            Step::Move { dx, dy } => {
                let Some(press) = self.press_point else {
                    log::debug!("Move without a press ignored");
                    return;
                };
                let translation = Vec2::new(dx, dy);
                self.board
                    .on_pointer_move(translation, press + translation, self.clock);
            }
            Step::Wait { ms } => self.wait(Duration::from_millis(ms)),
            Step::Release => {
                self.board.on_drag_end();
                self.after_gesture();
            }
            Step::Cancel => {
                self.board.on_drag_cancel();
                self.after_gesture();
            }
            Step::ToggleSection { section } => {
                if self.board.toggle_section(section) {
                    self.relayout();
                }
            }
            Step::Scroll { axis, offset } => {
                if !self.board.scroll_enabled() {
                    log::debug!("Scroll ignored while dragging");
                    return;
                }
                self.board
                    .on_scroll(axis, offset, self.content_extent(axis), self.viewport_extent(axis));
            }
        }
    }

    pub fn report(&self) -> ReplayReport {
        let grid = self.board.grid();
        let buckets = grid
            .sections
            .iter()
            .flat_map(|section| {
                section
                    .buckets
                    .iter()
                    .enumerate()
                    .filter(|(_, bucket)| !bucket.is_empty())
                    .map(move |(column, bucket)| BucketSnapshot {
                        section: section.index,
                        column,
                        items: bucket.iter().map(|item| item.data.clone()).collect(),
                    })
            })
            .collect();

        ReplayReport {
            moves: self.moves.borrow().clone(),
            buckets,
            scroll: self.board.scroll_offsets(),
            hover_trail: self.hover_trail.lock().clone(),
            board: format_board(&self.board.render(&TextRenderer)),
        }
    }

    fn press(&mut self, cell: CellAddress) {
        let Some(frame) = self.board.geometry().cell_frame(cell) else {
            log::warn!("Press on unknown cell {:?}", cell);
            return;
        };
        // Pointer in viewport space.
        let point = frame.center() - self.board.scroll_offsets();
        if self.board.on_drag_trigger(cell, self.clock) {
            self.press_point = Some(point);
        }
    }

    fn wait(&mut self, duration: Duration) {
        let end = self.clock + duration;
        while self.clock < end {
            let remaining = end.saturating_duration_since(self.clock);
            self.clock += remaining.min(FRAME);
            self.frame();
        }
    }

    fn frame(&mut self) {
        let mut sink = ContainerSink::default();
        self.board.tick(self.clock, &mut sink);
        // The container echoes what it was told as scroll events.
        for (axis, offset) in sink.calls {
            self.board
                .on_scroll(axis, offset, self.content_extent(axis), self.viewport_extent(axis));
        }
    }

    fn after_gesture(&mut self) {
        self.press_point = None;
        self.relayout();
    }

    fn relayout(&mut self) {
        self.content = self.layout.apply(&mut self.board);
        self.board
            .on_content_size_change(Axis::Horizontal, self.content.width);
        self.board
            .on_content_size_change(Axis::Vertical, self.content.height);
    }

    fn content_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.content.width,
            Axis::Vertical => self.content.height,
        }
    }

    fn viewport_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.viewport.width,
            Axis::Vertical => self.viewport.height,
        }
    }
}
