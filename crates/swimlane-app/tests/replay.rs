use serde_json::{Value, json};
use std::io::Write;
use swimlane_app::{BoardSpec, Replay, Scenario, ScenarioError, Step, Viewport};
use swimlane_core::{CellAddress, Column, DragTrigger, ItemInput, Section, SwimlaneConfig};

fn titles(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item["title"].as_str().unwrap_or_default())
        .collect()
}

#[test]
fn test_demo_scenario_moves_card_to_doing() {
    let scenario = Scenario::from_json(include_str!("../demos/board.json")).unwrap();
    let report = Replay::run(&scenario);

    assert_eq!(report.moves.len(), 1);
    let event = &report.moves[0];
    assert_eq!(event.id.as_str(), "cache");
    assert_eq!(event.from, CellAddress::new(0, 0, 1));
    assert_eq!(event.to, CellAddress::new(0, 1, 1));
    assert_eq!(event.item_before.as_ref().unwrap()["title"], "CI");

    let doing = report
        .buckets
        .iter()
        .find(|b| b.section == 0 && b.column == 1)
        .unwrap();
    assert_eq!(titles(&doing.items), vec!["CI", "Cache"]);
    assert!(report.board.contains("Cache"));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(include_str!("../demos/board.json").as_bytes())
        .unwrap();

    let scenario = Scenario::load(file.path()).unwrap();
    assert_eq!(scenario.board.columns.len(), 4);
    assert!(scenario.board.columns[3].disabled);
    assert_eq!(scenario.board.config.long_press_delay_ms, 400);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    let scenario = Scenario::from_json(include_str!("../demos/board.json")).unwrap();

    scenario.save(&path).unwrap();
    assert_eq!(Scenario::load(&path).unwrap(), scenario);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Scenario::load(&dir.path().join("nope.json"));
    assert!(matches!(result, Err(ScenarioError::Io(_))));
}

fn tall_column(count: usize) -> Scenario {
    Scenario {
        board: BoardSpec {
            columns: vec![Column::new(0, "Todo")],
            sections: vec![Section::new(0, "All").expanded(true)],
            items: (0..count)
                .map(|i| ItemInput::new(0, 0, json!({ "title": format!("i{}", i) })).with_key(format!("i{}", i)))
                .collect(),
            config: SwimlaneConfig {
                drag_trigger: DragTrigger::PanStart,
                ..SwimlaneConfig::default()
            },
        },
        viewport: Viewport {
            width: 200.0,
            height: 300.0,
        },
        steps: Vec::new(),
    }
}

#[test]
fn test_autoscroll_carries_drop_target_down() {
    let mut scenario = tall_column(10);
    scenario.steps = vec![
        Step::press(CellAddress::new(0, 0, 0)),
        Step::PanStart,
        // Near the bottom edge of a 300px viewport.
        Step::Move { dx: 0.0, dy: 200.0 },
        Step::Wait { ms: 1000 },
        Step::Release,
    ];
    let report = Replay::run(&scenario);

    // 10 rows plus one empty row of 80px under a 32px header.
    let max = 32.0 + 11.0 * 80.0 - 300.0;
    assert!(report.scroll.y > 300.0, "scrolled to {}", report.scroll.y);
    assert!(report.scroll.y <= max);
    assert_eq!(report.scroll.x, 0.0);

    assert_eq!(report.moves.len(), 1);
    let row = report.moves[0].to.row;
    assert!(row >= 5, "dropped on row {}", row);
    // The trailing empty row appends after the last card.
    let position = titles(&report.buckets[0].items)
        .iter()
        .position(|title| *title == "i0")
        .unwrap();
    assert_eq!(position, row.min(9));
    assert!(report.hover_trail.len() > 2);
}

#[test]
fn test_drop_outside_board_changes_nothing() {
    let mut scenario = tall_column(3);
    scenario.steps = vec![
        Step::press(CellAddress::new(0, 0, 1)),
        Step::PanStart,
        Step::Move { dx: 500.0, dy: 0.0 },
        Step::Release,
    ];
    let report = Replay::run(&scenario);
    assert!(report.moves.is_empty());
    assert_eq!(titles(&report.buckets[0].items), vec!["i0", "i1", "i2"]);
}

#[test]
fn test_collapsed_section_cannot_be_pressed() {
    let mut scenario = tall_column(3);
    scenario.steps = vec![
        Step::ToggleSection { section: 0 },
        Step::press(CellAddress::new(0, 0, 0)),
        Step::PanStart,
        Step::Move { dx: 0.0, dy: 100.0 },
        Step::Release,
    ];
    let report = Replay::run(&scenario);
    assert!(report.moves.is_empty());
    assert!(report.board.contains("> All"));
}
