mod animation;
mod scope;
mod state;
mod ui;

use clap::Parser;
use tracing::info;

use crate::scope::{Waveform, CUTOFF_MAX_HZ, CUTOFF_MIN_HZ};
use crate::state::AppState;

/// Animated oscilloscope for a small on-screen synthesizer keyboard.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Drone frequency in Hz shown while no note is held.
    #[arg(long, default_value_t = 220.0)]
    drone: f32,

    /// Start with the idle drone disabled (blank scope while no note is held).
    #[arg(long)]
    no_drone: bool,

    /// Initial waveform: sine, square, sawtooth, or triangle.
    #[arg(long, default_value = "sine")]
    waveform: String,

    /// Initial filter cutoff in Hz.
    #[arg(long, default_value_t = 2000.0)]
    cutoff: f32,
}

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let waveform = Waveform::from_name(&args.waveform);
    let cutoff = args.cutoff.clamp(CUTOFF_MIN_HZ, CUTOFF_MAX_HZ);
    let fallback = (!args.no_drone).then_some(args.drone);

    info!(
        waveform = waveform.name(),
        cutoff,
        drone = ?fallback,
        "starting scope"
    );

    let state = AppState::new(waveform, cutoff, fallback);
    ui::run_ui(state)
}
