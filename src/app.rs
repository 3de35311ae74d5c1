//! ShelfLife main window — egui/eframe application.
//!
//! # Architecture
//!
//! [`ShelfLifeApp`] is the top-level [`eframe::App`].  It owns the single
//! [`FormState`] shared by all tabs and three controllers:
//!
//! * [`PredictionHook`] — result / in-flight / error of the last prediction.
//! * [`VoicePlayback`] — one voice explanation at a time.
//! * [`ChatController`] — append-only chat log.
//!
//! Network work is spawned on the tokio runtime through `runtime`; the
//! controllers publish state that the update loop reads every frame.  Events
//! that are not part of a controller's state (alerts, health checks) come
//! back over `event_rx` and are drained with `try_recv`.
//!
//! # Tabs
//!
//! | Tab | Contents |
//! |-----|----------|
//! | `Prediction` | Form, predict button, result panel, listen button |
//! | `Voice` | Read-only input summary, play button |
//! | `Chat` | Message log, input line, quick actions |

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::api::{FoodType, HealthStatus, ShelfLifeApi, StorageType};
use crate::chat::{ChatController, Role};
use crate::config::AppConfig;
use crate::form::{FormState, NumericField};
use crate::prediction::PredictionHook;
use crate::view::{input_summary, ResultView, Tab, Tone};
use crate::voice::{AudioPlayer, VoicePlayback, PLAYBACK_ALERT};

// ---------------------------------------------------------------------------
// UiEvent
// ---------------------------------------------------------------------------

/// Events delivered from background tasks to the UI.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Outcome of a `/health` probe.
    Health(Result<HealthStatus, String>),
    /// Show a blocking alert with this message.
    Alert(String),
}

/// Backend status shown in the header.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendHealth {
    Checking,
    Healthy,
    ModelNotLoaded,
    Unreachable(String),
}

impl BackendHealth {
    fn label(&self) -> String {
        match self {
            BackendHealth::Checking => "Checking backend…".into(),
            BackendHealth::Healthy => "Backend online".into(),
            BackendHealth::ModelNotLoaded => "Backend online, model not loaded".into(),
            BackendHealth::Unreachable(e) => format!("Backend unreachable: {e}"),
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            BackendHealth::Checking => egui::Color32::from_rgb(140, 140, 140),
            BackendHealth::Healthy => egui::Color32::from_rgb(60, 170, 90),
            BackendHealth::ModelNotLoaded => egui::Color32::from_rgb(220, 170, 40),
            BackendHealth::Unreachable(_) => egui::Color32::from_rgb(220, 80, 70),
        }
    }
}

// ---------------------------------------------------------------------------
// ShelfLifeApp
// ---------------------------------------------------------------------------

pub struct ShelfLifeApp {
    // ── View state ───────────────────────────────────────────────────────
    tab: Tab,
    form: FormState,
    chat_input: String,
    /// Message of the open alert dialog, if any.
    alert: Option<String>,
    health: BackendHealth,

    // ── Controllers ──────────────────────────────────────────────────────
    prediction: PredictionHook,
    voice: VoicePlayback,
    chat: ChatController,
    api: Arc<dyn ShelfLifeApi>,

    // ── Async plumbing ───────────────────────────────────────────────────
    runtime: tokio::runtime::Handle,
    event_tx: mpsc::Sender<UiEvent>,
    event_rx: mpsc::Receiver<UiEvent>,
}

impl ShelfLifeApp {
    /// Create the app and kick off the first health check.
    ///
    /// * `api`     — backend client shared by all controllers.
    /// * `player`  — audio output for voice explanations.
    /// * `runtime` — handle of the tokio runtime that runs network work.
    /// * `config`  — loaded application configuration.
    pub fn new(
        api: Arc<dyn ShelfLifeApi>,
        player: Arc<dyn AudioPlayer>,
        runtime: tokio::runtime::Handle,
        config: &AppConfig,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);

        let app = Self {
            tab: config.ui.start_tab,
            form: FormState::new(config.form.initial_input()),
            chat_input: String::new(),
            alert: None,
            health: BackendHealth::Checking,
            prediction: PredictionHook::new(Arc::clone(&api)),
            voice: VoicePlayback::new(Arc::clone(&api), player),
            chat: ChatController::new(Arc::clone(&api)),
            api,
            runtime,
            event_tx,
            event_rx,
        };
        app.check_health();
        app
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn check_health(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            let outcome = api.health_check().await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::Health(outcome)).await;
        });
    }

    fn start_prediction(&self) {
        let pending = self.prediction.predict(self.form.input());
        self.runtime.spawn(async move {
            if let Err(e) = pending.await {
                log::error!("prediction failed: {e}");
            }
        });
    }

    fn start_voice(&self) {
        let Some(pending) = self.voice.trigger(self.form.input()) else {
            return;
        };
        let tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            if let Err(e) = pending.await {
                log::warn!("voice explanation failed: {e}");
                let _ = tx.send(UiEvent::Alert(PLAYBACK_ALERT.into())).await;
            }
        });
    }

    fn send_chat(&mut self) {
        if let Some(pending) = self.chat.submit(&self.chat_input) {
            self.chat_input.clear();
            self.runtime.spawn(pending);
        }
    }

    fn ask_explanation(&self) {
        if let Some(pending) = self.chat.explain_prediction(self.form.input()) {
            self.runtime.spawn(pending);
        }
    }

    fn ask_storage_advice(&self) {
        if let Some(pending) = self.chat.storage_advice(self.form.input()) {
            self.runtime.spawn(pending);
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending background events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Health(Ok(status)) => {
                log::info!(
                    "backend health: {} (model loaded: {})",
                    status.status,
                    status.pipeline_loaded
                );
                self.health = if status.pipeline_loaded {
                    BackendHealth::Healthy
                } else {
                    BackendHealth::ModelNotLoaded
                };
            }
            UiEvent::Health(Err(e)) => {
                log::warn!("backend health check failed: {e}");
                self.health = BackendHealth::Unreachable(e);
            }
            UiEvent::Alert(message) => {
                self.alert = Some(message);
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.prediction.is_loading()
            || self.voice.is_playing()
            || self.chat.is_loading()
            || self.health == BackendHealth::Checking
    }

    // ── Header ───────────────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new("ShelfLife AI").size(22.0).strong());
                ui.label(
                    egui::RichText::new("Smart Food Safety Predictor")
                        .color(egui::Color32::from_rgb(120, 120, 120))
                        .size(12.0),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for tab in Tab::ALL.iter().rev() {
                    ui.selectable_value(&mut self.tab, *tab, tab.label());
                }
                ui.separator();
                if ui.small_button("↻").on_hover_text("Check backend").clicked() {
                    self.health = BackendHealth::Checking;
                    self.check_health();
                }
                ui.label(
                    egui::RichText::new(self.health.label())
                        .color(self.health.color())
                        .size(11.0),
                );
            });
        });
        ui.add_space(6.0);
    }

    // ── Prediction tab ───────────────────────────────────────────────────

    fn draw_prediction_tab(&mut self, ui: &mut egui::Ui) {
        ui.columns(2, |columns| {
            self.draw_form(&mut columns[0]);
            self.draw_result(&mut columns[1]);
        });
    }

    fn draw_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Food Details");
        ui.add_space(8.0);

        let input = self.form.input();
        egui::Grid::new("food_form")
            .num_columns(2)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label("Food Type");
                let mut food_type = input.food_type;
                egui::ComboBox::from_id_salt("food_type")
                    .selected_text(food_type.label())
                    .show_ui(ui, |ui| {
                        for option in FoodType::ALL {
                            ui.selectable_value(&mut food_type, option, option.label());
                        }
                    });
                if food_type != input.food_type {
                    self.form.set_food_type(food_type);
                }
                ui.end_row();

                ui.label("Storage Type");
                let mut storage_type = input.storage_type;
                egui::ComboBox::from_id_salt("storage_type")
                    .selected_text(storage_type.label())
                    .show_ui(ui, |ui| {
                        for option in StorageType::ALL {
                            ui.selectable_value(&mut storage_type, option, option.label());
                        }
                    });
                if storage_type != input.storage_type {
                    self.form.set_storage_type(storage_type);
                }
                ui.end_row();

                for (label, field) in [
                    ("Temperature (°C)", NumericField::Temperature),
                    ("Humidity (%)", NumericField::Humidity),
                    ("Days Stored", NumericField::DaysStored),
                ] {
                    ui.label(label);
                    if ui.text_edit_singleline(self.form.text_mut(field)).changed() {
                        self.form.commit(field);
                    }
                    ui.end_row();
                }
            });

        ui.add_space(12.0);
        let loading = self.prediction.is_loading();
        let label = if loading {
            "Analyzing..."
        } else {
            "Predict Shelf Life"
        };
        let button = egui::Button::new(egui::RichText::new(label).size(15.0))
            .min_size(egui::vec2(ui.available_width(), 36.0));
        if ui.add_enabled(!loading, button).clicked() {
            self.start_prediction();
        }

        if let Some(error) = self.prediction.snapshot().error {
            ui.add_space(8.0);
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(60, 30, 30))
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(240, 120, 110), error);
                });
        }
    }

    fn draw_result(&mut self, ui: &mut egui::Ui) {
        ui.heading("Analysis Results");
        ui.add_space(8.0);

        let Some(result) = self.prediction.snapshot().result else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Enter food details and click Predict to see results")
                        .color(egui::Color32::from_rgb(130, 130, 130)),
                );
            });
            return;
        };
        let view = ResultView::from(&result);

        ui.label("Predicted Remaining Days");
        ui.label(
            egui::RichText::new(&view.remaining_days)
                .size(36.0)
                .strong()
                .color(egui::Color32::from_rgb(70, 130, 230)),
        );
        ui.label(
            egui::RichText::new(format!("raw model output: {}", view.raw_prediction))
                .size(10.0)
                .color(egui::Color32::from_rgb(130, 130, 130)),
        );

        ui.add_space(6.0);
        let accent = view.badge.tone.map(tone_color);
        egui::Frame::new()
            .fill(accent.map_or(egui::Color32::TRANSPARENT, |c| c.gamma_multiply(0.15)))
            .stroke(egui::Stroke::new(
                1.0,
                accent.unwrap_or(egui::Color32::from_rgb(110, 110, 110)),
            ))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if let Some(icon) = view.badge.icon {
                        ui.label(egui::RichText::new(icon).color(accent.unwrap_or_default()));
                    }
                    let text = egui::RichText::new(&view.badge.label).strong();
                    ui.label(match accent {
                        Some(c) => text.color(c),
                        None => text,
                    });
                    if let Some(severity) = &view.severity {
                        ui.label(
                            egui::RichText::new(format!("severity: {severity}"))
                                .size(11.0)
                                .color(egui::Color32::from_rgb(150, 150, 150)),
                        );
                    }
                });
            });

        if !view.issues.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Issues Detected").strong());
            for issue in &view.issues {
                ui.colored_label(tone_color(Tone::Red), format!("• {issue}"));
            }
        }

        if !view.recommendations.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Recommendations").strong());
            for rec in &view.recommendations {
                ui.colored_label(tone_color(Tone::Green), format!("• {rec}"));
            }
        }

        if !view.features.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Feature Importance").strong());
            for bar in &view.features {
                ui.add(
                    egui::ProgressBar::new(bar.fraction)
                        .text(format!("{} ({:.2})", bar.name, bar.weight)),
                );
            }
        }

        ui.add_space(10.0);
        self.draw_voice_button(ui, "▶ Listen to Explanation", "Playing...");
    }

    fn draw_voice_button(&mut self, ui: &mut egui::Ui, idle: &str, busy: &str) {
        let playing = self.voice.is_playing();
        let button = egui::Button::new(if playing { busy } else { idle })
            .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(!playing, button).clicked() {
            self.start_voice();
        }
    }

    // ── Voice tab ────────────────────────────────────────────────────────

    fn draw_voice_tab(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading("AI Voice Assistant");
            ui.label("Get spoken explanations of your food safety predictions");
        });
        ui.add_space(12.0);

        egui::Grid::new("voice_summary")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                for (label, value) in input_summary(&self.form.input()) {
                    ui.label(egui::RichText::new(label).color(egui::Color32::from_rgb(130, 130, 130)));
                    ui.label(egui::RichText::new(value).strong());
                    ui.end_row();
                }
            });

        ui.add_space(12.0);
        self.draw_voice_button(ui, "▶ Play Voice Explanation", "Playing Audio...");

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(
                "Voice explanations require a text-to-speech key configured on the backend.",
            )
            .size(11.0)
            .color(egui::Color32::from_rgb(120, 150, 200)),
        );
    }

    // ── Chat tab ─────────────────────────────────────────────────────────

    fn draw_chat_tab(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading("Food Safety Chat");
            ui.label("Ask questions about food storage, safety, and best practices");
        });
        ui.add_space(8.0);

        let session = self.chat.snapshot();
        let log_height = (ui.available_height() - 80.0).max(120.0);

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if session.messages.is_empty() && !session.loading {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new("Start a conversation")
                                .color(egui::Color32::from_rgb(130, 130, 130)),
                        );
                    });
                }
                for message in &session.messages {
                    let (layout, fill) = match message.role {
                        Role::User => (
                            egui::Layout::right_to_left(egui::Align::TOP),
                            egui::Color32::from_rgb(50, 90, 170),
                        ),
                        Role::Assistant => (
                            egui::Layout::left_to_right(egui::Align::TOP),
                            egui::Color32::from_rgb(55, 55, 60),
                        ),
                    };
                    ui.with_layout(layout, |ui| {
                        ui.set_max_width(ui.available_width() * 0.8);
                        egui::Frame::new()
                            .fill(fill)
                            .corner_radius(egui::CornerRadius::same(6))
                            .inner_margin(egui::Margin::same(8))
                            .show(ui, |ui| {
                                ui.label(
                                    egui::RichText::new(&message.content)
                                        .color(egui::Color32::from_rgb(235, 235, 235)),
                                );
                            });
                    });
                    ui.add_space(4.0);
                }
                if session.loading {
                    ui.spinner();
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            let input = egui::TextEdit::singleline(&mut self.chat_input)
                .hint_text("Ask about food storage, safety, or your prediction...")
                .desired_width(ui.available_width() - 70.0);
            let response = ui.add_enabled(!session.loading, input);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let can_send = !session.loading && !self.chat_input.trim().is_empty();
            let clicked = ui.add_enabled(can_send, egui::Button::new("Send")).clicked();

            if (submitted || clicked) && can_send {
                self.send_chat();
                response.request_focus();
            }
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!session.loading, egui::Button::new("Explain my prediction"))
                .clicked()
            {
                self.ask_explanation();
            }
            if ui
                .add_enabled(!session.loading, egui::Button::new("Storage advice"))
                .clicked()
            {
                self.ask_storage_advice();
            }
        });
    }

    // ── Alert ────────────────────────────────────────────────────────────

    fn draw_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

fn tone_color(tone: Tone) -> egui::Color32 {
    match tone {
        Tone::Green => egui::Color32::from_rgb(60, 170, 90),
        Tone::Yellow => egui::Color32::from_rgb(220, 170, 40),
        Tone::Red => egui::Color32::from_rgb(220, 80, 70),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for ShelfLifeApp {
    /// Called every frame by eframe.  Drains background events, then renders
    /// the header, the active tab and any open alert.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        // Background tasks finish without waking the UI; poll while busy.
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let blocked = self.alert.is_some();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| self.draw_header(ui));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| match self.tab {
                Tab::Prediction => self.draw_prediction_tab(ui),
                Tab::Voice => self.draw_voice_tab(ui),
                Tab::Chat => self.draw_chat_tab(ui),
            });
        });

        self.draw_alert(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("ShelfLife window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
