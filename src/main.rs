mod app;

use app::MyApp;
use microlearn_app::database::db::{init_database, load_or_seed};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let conn = init_database().expect("Failed to initialize database");
    let state = load_or_seed(&conn);

    log::info!(
        "loaded {} decks, {} cards",
        state.decks.len(),
        state.cards.len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([480.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Microlearn",
        options,
        Box::new(|_cc| Ok(Box::new(MyApp::new(state, conn)))),
    )
}
