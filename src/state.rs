use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::scope::{ScopeParams, Waveform};

/// Centralized state shared between the parameter controls and the scope.
#[derive(Debug)]
pub struct AppState {
    /// Note numbers currently held down on the on-screen keyboard.
    pub active_notes: Mutex<HashSet<u8>>,

    /// Waveform used for sample synthesis.
    pub waveform: Mutex<Waveform>,

    /// Low-pass cutoff in Hz; only attenuates the drawn trace.
    pub filter_cutoff: Mutex<f32>,

    /// Drone pitch shown while no note is held. `None` blanks the scope.
    pub fallback_frequency: Mutex<Option<f32>>,
}

impl AppState {
    pub fn new(waveform: Waveform, filter_cutoff: f32, fallback_frequency: Option<f32>) -> Arc<Self> {
        Arc::new(Self {
            active_notes: Mutex::new(HashSet::new()),
            waveform: Mutex::new(waveform),
            filter_cutoff: Mutex::new(filter_cutoff),
            fallback_frequency: Mutex::new(fallback_frequency),
        })
    }

    /// Snapshots the current parameters for one render tick.
    pub fn scope_params(&self) -> ScopeParams {
        let active_frequencies = self
            .active_notes
            .lock()
            .unwrap()
            .iter()
            .map(|&note| note_to_freq(note))
            .collect();
        ScopeParams {
            active_frequencies,
            fallback_frequency: *self.fallback_frequency.lock().unwrap(),
            waveform: *self.waveform.lock().unwrap(),
            filter_cutoff: *self.filter_cutoff.lock().unwrap(),
        }
    }
}

/// Converts a MIDI note number to frequency (A4 = 69 = 440 Hz).
pub fn note_to_freq(note: u8) -> f32 {
    440.0 * (2.0_f32).powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_to_freq_anchors() {
        assert_eq!(note_to_freq(69), 440.0);
        assert!((note_to_freq(57) - 220.0).abs() < 1e-3);
        assert!((note_to_freq(60) - 261.63).abs() < 0.01);
    }

    #[test]
    fn scope_params_snapshot_reflects_held_notes() {
        let state = AppState::new(Waveform::Square, 1500.0, Some(220.0));
        state.active_notes.lock().unwrap().insert(69);
        state.active_notes.lock().unwrap().insert(57);

        let params = state.scope_params();
        assert_eq!(params.waveform, Waveform::Square);
        assert_eq!(params.filter_cutoff, 1500.0);
        assert_eq!(params.fallback_frequency, Some(220.0));
        let mut frequencies = params.active_frequencies.clone();
        frequencies.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(frequencies.len(), 2);
        assert!((frequencies[0] - 220.0).abs() < 1e-3);
        assert_eq!(frequencies[1], 440.0);
    }
}
