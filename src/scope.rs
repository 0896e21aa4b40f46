use egui::{Color32, Pos2, Stroke};

/// Number of curve segments per frame; the buffers hold `SAMPLE_COUNT + 1` points.
pub const SAMPLE_COUNT: usize = 900;

/// Radius of the moving-average window applied to the raw samples.
pub const SMOOTHING_RADIUS: usize = 6;

/// Cutoff at or above this value draws the curve at full amplitude.
pub const CUTOFF_MAX_HZ: f32 = 5000.0;

/// Lower edge of the cutoff control in the UI.
pub const CUTOFF_MIN_HZ: f32 = 20.0;

/// Horizontal reference rows drawn behind the trace.
pub const GRID_ROWS: usize = 10;

// Scales wall-clock seconds into phase advance so the trace drifts slowly.
const TIME_SCALE: f32 = 0.01;

// The curve occupies 80% of the surface height, leaving a 10% margin top and bottom.
const VERTICAL_FILL: f32 = 0.8;

const BACKGROUND: Color32 = Color32::from_rgb(10, 16, 12);
const GRID_COLOR: Color32 = Color32::from_rgb(28, 54, 36);
const TRACE_COLOR: Color32 = Color32::from_rgb(92, 244, 130);
const TRACE_WIDTH: f32 = 1.8;
const GRID_WIDTH: f32 = 1.0;

/// Periodic function used for sample synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Parses a waveform name. Unrecognized names fall back to sine so a bad
    /// value can never take down sample synthesis.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "square" => Waveform::Square,
            "sawtooth" | "saw" => Waveform::Sawtooth,
            "triangle" | "tri" => Waveform::Triangle,
            _ => Waveform::Sine,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    /// Evaluates the waveform at phase `t` (radians), in [-1, 1].
    pub fn sample(self, t: f32) -> f32 {
        use std::f32::consts::TAU;
        match self {
            Waveform::Sine => t.sin(),
            Waveform::Square => {
                // sign(sin t), keeping sign(0) = 0. f32::signum maps 0.0 to
                // 1.0, which would change the sample at exact zero crossings.
                let s = t.sin();
                if s == 0.0 {
                    0.0
                } else {
                    s.signum()
                }
            }
            Waveform::Sawtooth => 2.0 * (t / TAU).rem_euclid(1.0) - 1.0,
            Waveform::Triangle => 2.0 * (2.0 * (t / TAU).rem_euclid(1.0) - 1.0).abs() - 1.0,
        }
    }
}

/// Snapshot of the scope inputs for one tick. The renderer reads it once per
/// frame and never mutates the source state.
#[derive(Debug, Clone)]
pub struct ScopeParams {
    /// Currently sounding pitches in Hz. May be empty.
    pub active_frequencies: Vec<f32>,
    /// Drone pitch substituted when no note is held; `None` blanks the scope.
    pub fallback_frequency: Option<f32>,
    pub waveform: Waveform,
    /// Cutoff in Hz; attenuates the drawn amplitude only, not the samples' shape.
    pub filter_cutoff: f32,
}

impl ScopeParams {
    /// The frequencies that drive this tick: the active set, or the fallback
    /// drone when nothing is held. `None` means draw a blank frame.
    fn frequencies(&self) -> Option<Frequencies<'_>> {
        if !self.active_frequencies.is_empty() {
            Some(Frequencies::Held(&self.active_frequencies))
        } else {
            self.fallback_frequency.map(Frequencies::Drone)
        }
    }
}

enum Frequencies<'a> {
    Held(&'a [f32]),
    Drone(f32),
}

impl Frequencies<'_> {
    fn as_slice(&self) -> &[f32] {
        match self {
            Frequencies::Held(slice) => *slice,
            Frequencies::Drone(hz) => std::slice::from_ref(hz),
        }
    }
}

/// Drawing-surface contract the renderer needs: clear, horizontal reference
/// lines, and one stroked polyline. Coordinates are local to the surface,
/// origin top-left.
pub trait ScopeSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self, color: Color32);
    fn line_segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke);
}

/// Visual attenuation derived from the filter cutoff: 1.0 (no attenuation) at
/// or above 5000 Hz, floored at 0.5 for cutoffs at or below zero.
fn filter_gain(filter_cutoff: f32) -> f32 {
    let filter_effect = (1.0 - filter_cutoff / CUTOFF_MAX_HZ).clamp(0.0, 1.0);
    1.0 - filter_effect * 0.5
}

/// Renders the animated waveform trace for the currently active notes.
///
/// Owns two fixed-length sample buffers that are refilled from scratch every
/// tick; no pixel state survives between frames.
pub struct ScopeRenderer {
    raw: Vec<f32>,
    smoothed: Vec<f32>,
}

impl ScopeRenderer {
    pub fn new() -> Self {
        Self {
            raw: vec![0.0; SAMPLE_COUNT + 1],
            smoothed: vec![0.0; SAMPLE_COUNT + 1],
        }
    }

    /// Draws one frame: background, grid, then the smoothed trace. With no
    /// active notes and no fallback frequency the surface is cleared and
    /// nothing else is drawn.
    pub fn render(&mut self, surface: &mut dyn ScopeSurface, params: &ScopeParams, clock_seconds: f32) {
        surface.clear(BACKGROUND);

        let Some(frequencies) = params.frequencies() else {
            return;
        };

        let width = surface.width();
        let height = surface.height();

        let grid_stroke = Stroke::new(GRID_WIDTH, GRID_COLOR);
        for row in 0..=GRID_ROWS {
            let y = height * row as f32 / GRID_ROWS as f32;
            surface.line_segment(Pos2::new(0.0, y), Pos2::new(width, y), grid_stroke);
        }

        self.synthesize(
            frequencies.as_slice(),
            params.waveform,
            params.filter_cutoff,
            clock_seconds,
        );
        self.smooth();

        let mid = height / 2.0;
        let amplitude = mid * VERTICAL_FILL;
        let points: Vec<Pos2> = self
            .smoothed
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                let x = i as f32 / SAMPLE_COUNT as f32 * width;
                Pos2::new(x, mid + sample * amplitude)
            })
            .collect();
        surface.polyline(points, Stroke::new(TRACE_WIDTH, TRACE_COLOR));
    }

    /// Fills the raw buffer from the given frequencies. Contributions are
    /// summed and divided by the frequency count, so the mix stays in [-1, 1]
    /// before the cutoff attenuation is applied.
    pub fn synthesize(
        &mut self,
        frequencies: &[f32],
        waveform: Waveform,
        filter_cutoff: f32,
        clock_seconds: f32,
    ) {
        use std::f32::consts::PI;

        let count = frequencies.len().max(1) as f32;
        let gain = filter_gain(filter_cutoff);

        for (i, raw) in self.raw.iter_mut().enumerate() {
            let base = i as f32 / SAMPLE_COUNT as f32 * 4.0 * PI;
            let mut sum = 0.0;
            for &hz in frequencies {
                let t = base + clock_seconds * hz * TIME_SCALE;
                sum += waveform.sample(t);
            }
            *raw = sum / count * gain;
        }
    }

    /// Moving average over `raw` with a fixed radius. Windows are truncated
    /// at the buffer edges rather than wrapped or padded.
    pub fn smooth(&mut self) {
        for i in 0..self.raw.len() {
            let lo = i.saturating_sub(SMOOTHING_RADIUS);
            let hi = (i + SMOOTHING_RADIUS).min(self.raw.len() - 1);
            let sum: f32 = self.raw[lo..=hi].iter().sum();
            self.smoothed[i] = sum / (hi - lo + 1) as f32;
        }
    }

}

impl Default for ScopeRenderer {
    fn default() -> Self {
        Self::new()
    }
}
