use std::sync::Arc;
use std::time::Instant;

use eframe::{App, CreationContext};
use egui::{CentralPanel, Color32, ComboBox, Context, Pos2, Slider, Stroke};
use tracing::debug;

use crate::animation::FrameLoop;
use crate::scope::{ScopeRenderer, ScopeSurface, Waveform, CUTOFF_MAX_HZ, CUTOFF_MIN_HZ};
use crate::state::AppState;

const SCOPE_HEIGHT: f32 = 320.0;

/// One octave of on-screen keys, C4 through B4.
const KEYS: [(&str, u8); 12] = [
    ("C", 60),
    ("C#", 61),
    ("D", 62),
    ("D#", 63),
    ("E", 64),
    ("F", 65),
    ("F#", 66),
    ("G", 67),
    ("G#", 68),
    ("A", 69),
    ("A#", 70),
    ("B", 71),
];

/// `ScopeSurface` backed by an egui painter over an allocated screen rect.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
}

impl ScopeSurface for PainterSurface<'_> {
    fn width(&self) -> f32 {
        self.rect.width()
    }

    fn height(&self) -> f32 {
        self.rect.height()
    }

    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 2.0, color);
    }

    fn line_segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        let origin = self.rect.min.to_vec2();
        self.painter.line_segment([from + origin, to + origin], stroke);
    }

    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        let origin = self.rect.min.to_vec2();
        let shifted: Vec<Pos2> = points.into_iter().map(|p| p + origin).collect();
        self.painter.add(egui::Shape::line(shifted, stroke));
    }
}

/// A struct representing the application UI.
pub struct ScopeApp {
    state: Arc<AppState>,
    renderer: ScopeRenderer,
    frame_loop: FrameLoop,
    started: Instant,
}

impl ScopeApp {
    /// Creates a new instance and arms the first animation frame.
    pub fn new(state: Arc<AppState>, cc: &CreationContext) -> Self {
        let frame_loop = FrameLoop::new();
        frame_loop.start(&cc.egui_ctx);
        Self {
            state,
            renderer: ScopeRenderer::new(),
            frame_loop,
            started: Instant::now(),
        }
    }
}

impl App for ScopeApp {
    /// The update method is called every frame to update and render the UI.
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        CentralPanel::default().show(ctx, |ui| {
            ui.heading("Oscilloscope");

            ui.horizontal(|ui| {
                let mut waveform = self.state.waveform.lock().unwrap();
                ComboBox::from_label("waveform")
                    .selected_text(waveform.name())
                    .show_ui(ui, |ui| {
                        for candidate in Waveform::ALL {
                            ui.selectable_value(&mut *waveform, candidate, candidate.name());
                        }
                    });
                drop(waveform);

                let mut cutoff = self.state.filter_cutoff.lock().unwrap();
                ui.add(
                    Slider::new(&mut *cutoff, CUTOFF_MIN_HZ..=CUTOFF_MAX_HZ)
                        .text("cutoff (Hz)")
                        .logarithmic(true),
                );
                drop(cutoff);

                let mut fallback = self.state.fallback_frequency.lock().unwrap();
                let mut drone = fallback.is_some();
                if ui.checkbox(&mut drone, "idle drone").changed() {
                    *fallback = drone.then_some(220.0);
                    debug!(enabled = drone, "drone toggled");
                }
            });

            ui.horizontal(|ui| {
                let mut active_notes = self.state.active_notes.lock().unwrap();
                for (name, note) in KEYS {
                    let held = active_notes.contains(&note);
                    if ui.selectable_label(held, name).clicked() {
                        if held {
                            active_notes.remove(&note);
                            debug!(note, "note off");
                        } else {
                            active_notes.insert(note);
                            debug!(note, "note on");
                        }
                    }
                }
                drop(active_notes);

                ui.separator();
                if self.frame_loop.is_active() {
                    if ui.button("freeze").clicked() {
                        self.frame_loop.stop();
                    }
                } else if ui.button("run").clicked() {
                    self.frame_loop.start(ctx);
                }
            });

            let size = egui::vec2(ui.available_width().max(100.0), SCOPE_HEIGHT);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let mut surface = PainterSurface {
                painter: &painter,
                rect: response.rect,
            };

            let params = self.state.scope_params();
            let clock_seconds = self.started.elapsed().as_secs_f32();
            let renderer = &mut self.renderer;
            self.frame_loop
                .tick(ctx, || renderer.render(&mut surface, &params, clock_seconds));
        });
    }
}

/// Initializes and runs the eframe application.
pub fn run_ui(state: Arc<AppState>) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([980.0, 460.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Oscilloscope",
        options,
        Box::new(move |cc: &CreationContext| Ok(Box::new(ScopeApp::new(state.clone(), cc)))),
    )
}
