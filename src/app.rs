//! Main application UI and state wiring.
//!
//! Every user command mutates the [`AppState`] through the model layer, then
//! persists the whole state; egui's immediate mode takes care of the
//! re-render. Drag-in-progress is purely presentational and only reaches the
//! state machine as a finalized horizontal distance on pointer release.

use eframe::egui;
use rusqlite::Connection;

use microlearn_app::database::db;
use microlearn_app::error::Error;
use microlearn_app::export::json::{
    export_deck, export_file_name, export_json_to_path, import_document, import_json,
};
use microlearn_app::models::editor::parse_tags;
use microlearn_app::models::{AppState, Card, Decision, classify_drag};

/// Main application state
pub struct MyApp {
    state: AppState,
    conn: Connection,

    new_deck_title: String,

    show_card_modal: bool,
    editing_card_id: Option<String>,
    front_input: String,
    back_input: String,
    tags_input: String,
    form_error: Option<String>,

    // Presentation-only state for the top card.
    flipped: bool,
    drag_offset: egui::Vec2,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_result_dialog: bool,
    result_message: String,
}

impl MyApp {
    pub fn new(state: AppState, conn: Connection) -> Self {
        Self {
            state,
            conn,
            new_deck_title: String::new(),
            show_card_modal: false,
            editing_card_id: None,
            front_input: String::new(),
            back_input: String::new(),
            tags_input: String::new(),
            form_error: None,
            flipped: false,
            drag_offset: egui::Vec2::ZERO,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_result_dialog: false,
            result_message: String::new(),
        }
    }

    /// Writes the state back after a mutation. Failure is reported once and
    /// the in-memory state stays authoritative for the rest of the session.
    fn persist(&mut self) {
        if let Err(e) = db::save_state(&self.conn, &self.state) {
            log::error!("failed to persist state: {e}");
            self.result_message = format!("Saving failed: {e}");
            self.show_result_dialog = true;
        }
    }

    fn record_review(&mut self, decision: Decision) {
        if self.state.review(decision) {
            self.flipped = false;
            self.persist();
        }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard shortcuts mirror the buttons; disabled while the card
        // form is open so typing does not drive the review session.
        if !self.show_card_modal {
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                self.record_review(Decision::Skipped);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                self.record_review(Decision::Known);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
                self.flipped = !self.flipped;
            }
        }

        self.render_main_screen(ctx);
        self.render_card_modal(ctx);

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.allowed_to_close {
                // Allow close
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.show_confirmation_dialog = true;
            }
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl MyApp {
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            // Deck selector
            ui.horizontal(|ui| {
                ui.label("Deck:");
                let current_title = self
                    .state
                    .current_deck()
                    .map(|d| d.title.clone())
                    .unwrap_or_else(|| "No deck".to_string());
                let current_id = self.state.current_deck().map(|d| d.id.clone());

                let mut selected: Option<String> = None;
                egui::ComboBox::from_id_salt("deck_select")
                    .selected_text(current_title)
                    .show_ui(ui, |ui| {
                        for deck in &self.state.decks {
                            let is_current = current_id.as_deref() == Some(deck.id.as_str());
                            if ui.selectable_label(is_current, &deck.title).clicked() {
                                selected = Some(deck.id.clone());
                            }
                        }
                    });
                if let Some(id) = selected {
                    self.state.select_deck(&id);
                    self.flipped = false;
                    self.drag_offset = egui::Vec2::ZERO;
                    self.persist();
                }

                ui.label(format!(
                    "Known: {} · Skipped: {}",
                    self.state.stats.known, self.state.stats.skipped
                ));
            });

            // Deck info
            if let Some(deck) = self.state.current_deck() {
                let count = self.state.cards_of_deck(&deck.id).len();
                ui.horizontal(|ui| {
                    ui.strong(&deck.title);
                    if !deck.description.is_empty() {
                        ui.label(&deck.description);
                    }
                    ui.small(format!("{} cards · {}", count, deck.tags.join(",")));
                });
            } else {
                ui.label("No deck. Create one to get started.");
            }

            ui.separator();

            self.render_card_stack(ui);

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Flip").clicked() {
                    self.flipped = !self.flipped;
                }
                if ui.button("Skip").clicked() {
                    self.record_review(Decision::Skipped);
                }
                if ui.button("Know").clicked() {
                    self.record_review(Decision::Known);
                }
                ui.small("← skip · → know · space flip");
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("+ Card").clicked() {
                    self.open_new_card();
                }
                if ui.button("Export Deck").clicked() {
                    self.handle_export();
                }
                if ui.button("Import Deck").clicked() {
                    self.handle_import();
                }
            });

            ui.horizontal(|ui| {
                ui.label("New deck:");
                ui.text_edit_singleline(&mut self.new_deck_title);
                if ui.button("Create Deck").clicked() {
                    match self.state.create_deck(&self.new_deck_title) {
                        Ok(deck) => {
                            log::info!("created deck '{}'", deck.title);
                            self.new_deck_title.clear();
                            self.flipped = false;
                            self.drag_offset = egui::Vec2::ZERO;
                            self.persist();
                        }
                        Err(e) => {
                            // Input stays in the field for correction.
                            self.result_message = e.to_string();
                            self.show_result_dialog = true;
                        }
                    }
                }
            });
        });
    }

    /// Draws the top three cards of the current deck from the cursor on. The
    /// top card is draggable; on release the finalized horizontal distance is
    /// classified, sub-threshold drags spring back.
    fn render_card_stack(&mut self, ui: &mut egui::Ui) {
        let cards: Vec<Card> = self.state.current_cards().into_iter().cloned().collect();

        let size = egui::vec2(ui.available_width().min(360.0), 200.0);
        if cards.is_empty() {
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            draw_card_frame(ui, rect);
            draw_card_text(ui, rect, "No cards. Press + Card to start.");
            return;
        }

        let index = self.state.index.min(cards.len() - 1);
        let visible = &cards[index..cards.len().min(index + 3)];

        let (area, response) = ui.allocate_exact_size(
            size + egui::vec2(0.0, 20.0),
            egui::Sense::click_and_drag(),
        );
        let base = egui::Rect::from_min_size(area.min, size);

        // Stacked frames behind the top card, back-to-front.
        for i in (1..visible.len()).rev() {
            let behind = base
                .translate(egui::vec2(0.0, i as f32 * 8.0))
                .shrink2(egui::vec2(i as f32 * 8.0, 0.0));
            draw_card_frame(ui, behind);
        }

        if response.dragged() {
            self.drag_offset += response.drag_delta();
        }

        let top_rect = base.translate(self.drag_offset);
        draw_card_frame(ui, top_rect);
        let card = &visible[0];
        let text = if self.flipped { &card.back } else { &card.front };
        draw_card_text(ui, top_rect, text);

        let side = if self.flipped { "back" } else { "front" };
        ui.small(format!(
            "{} · card {} of {} · {}",
            side,
            index + 1,
            cards.len(),
            card.tags.join(",")
        ));

        // Short click flips, right click edits, released drag classifies.
        if response.clicked() {
            self.flipped = !self.flipped;
        }
        if response.secondary_clicked() {
            self.open_edit_card(card.clone());
        }
        if response.drag_stopped() {
            let dx = self.drag_offset.x;
            self.drag_offset = egui::Vec2::ZERO;
            if let Some(decision) = classify_drag(dx) {
                self.state.advance(decision);
                self.flipped = false;
                self.persist();
            }
        }
    }

    fn open_new_card(&mut self) {
        if self.state.current_deck().is_none() {
            self.result_message = "Select a deck first".to_string();
            self.show_result_dialog = true;
            return;
        }
        self.editing_card_id = None;
        self.front_input.clear();
        self.back_input.clear();
        self.tags_input.clear();
        self.form_error = None;
        self.show_card_modal = true;
    }

    fn open_edit_card(&mut self, card: Card) {
        self.editing_card_id = Some(card.id);
        self.front_input = card.front;
        self.back_input = card.back;
        self.tags_input = card.tags.join(",");
        self.form_error = None;
        self.show_card_modal = true;
    }

    fn render_card_modal(&mut self, ctx: &egui::Context) {
        if !self.show_card_modal {
            return;
        }
        let title = if self.editing_card_id.is_some() {
            "Edit Card"
        } else {
            "New Card"
        };

        let mut action_save = false;
        let mut action_cancel = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Front:");
                ui.text_edit_multiline(&mut self.front_input);
                ui.label("Back:");
                ui.text_edit_multiline(&mut self.back_input);
                ui.label("Tags (comma separated):");
                ui.text_edit_singleline(&mut self.tags_input);

                if let Some(err) = &self.form_error {
                    ui.colored_label(egui::Color32::RED, err);
                }

                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        action_save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        action_cancel = true;
                    }
                });
            });

        if action_save {
            self.submit_card_form();
        }
        if action_cancel {
            self.show_card_modal = false;
            self.editing_card_id = None;
        }
    }

    /// Routes the card form to create or update. Validation failures keep the
    /// form open with the input retained; an edit whose target vanished is
    /// logged and dropped.
    fn submit_card_form(&mut self) {
        let tags = parse_tags(&self.tags_input);
        let front = self.front_input.clone();
        let back = self.back_input.clone();

        let result = match self.editing_card_id.clone() {
            Some(card_id) => self.state.update_card(&card_id, &front, &back, tags),
            None => {
                let deck_id = match self.state.current_deck() {
                    Some(deck) => deck.id.clone(),
                    None => return,
                };
                self.state.create_card(&deck_id, &front, &back, tags)
            }
        };

        match result {
            Ok(_) => {}
            Err(Error::NotFound(what)) => {
                log::warn!("dropping edit of missing {what}");
            }
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        }

        self.persist();
        self.show_card_modal = false;
        self.editing_card_id = None;
        self.front_input.clear();
        self.back_input.clear();
        self.tags_input.clear();
    }

    /// Exports the current deck to a JSON file picked by the user.
    fn handle_export(&mut self) {
        let Some(deck) = self.state.current_deck().cloned() else {
            self.result_message = "Select a deck first".to_string();
            self.show_result_dialog = true;
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(export_file_name(&deck))
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            let outcome = export_deck(&self.state, &deck.id)
                .and_then(|doc| export_json_to_path(&doc, &path));
            match outcome {
                Ok(()) => {
                    self.result_message =
                        format!("Deck '{}' exported successfully!", deck.title);
                }
                Err(e) => {
                    log::warn!("export failed: {e}");
                    self.result_message = format!("Export failed: {e}");
                }
            }
            self.show_result_dialog = true;
        }
    }

    /// Imports a deck document from a JSON file picked by the user.
    fn handle_import(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            let outcome =
                import_json(&path).and_then(|doc| import_document(&mut self.state, doc));
            match outcome {
                Ok(deck) => {
                    self.flipped = false;
                    self.drag_offset = egui::Vec2::ZERO;
                    self.persist();
                    self.result_message = format!(
                        "Deck '{}' imported with {} cards!",
                        deck.title,
                        self.state.cards_of_deck(&deck.id).len()
                    );
                }
                Err(e) => {
                    log::warn!("import failed: {e}");
                    self.result_message = format!(
                        "Import failed: {e}\n\nExpected structure:\n{{\n  \"deck\": {{ \"title\": \"...\" }},\n  \"cards\": [...]\n}}"
                    );
                }
            }
            self.show_result_dialog = true;
        }
    }
}

fn draw_card_frame(ui: &egui::Ui, rect: egui::Rect) {
    let painter = ui.painter();
    painter.rect_filled(rect, egui::Rounding::same(10.0), ui.visuals().extreme_bg_color);
    painter.rect_stroke(
        rect,
        egui::Rounding::same(10.0),
        ui.visuals().widgets.inactive.bg_stroke,
    );
}

fn draw_card_text(ui: &egui::Ui, rect: egui::Rect, text: &str) {
    let inner = rect.shrink(16.0);
    let galley = ui.fonts(|f| {
        f.layout(
            text.to_string(),
            egui::FontId::proportional(16.0),
            ui.visuals().text_color(),
            inner.width(),
        )
    });
    let pos = egui::pos2(
        inner.center().x - galley.size().x / 2.0,
        inner.center().y - galley.size().y / 2.0,
    );
    ui.painter().galley(pos, galley, ui.visuals().text_color());
}
