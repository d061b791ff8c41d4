//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: swimlane <scenario.json>");
        std::process::exit(2);
    };
    log::info!("Replaying {}", path);

    let scenario = match swimlane_app::Scenario::load(std::path::Path::new(&path)) {
        Ok(scenario) => scenario,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let report = swimlane_app::Replay::run(&scenario);
    println!("{}", report.board);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
