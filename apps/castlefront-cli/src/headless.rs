use castlefront_common::{Outcome, Side};
use castlefront_driver::FrameDriver;
use castlefront_input::Action;
use castlefront_kernel::{Battlefield, ConfigError, MatchConfig, MatchEvent};
use castlefront_render::DebugTextRenderer;
use castlefront_tools::{MatchInspector, MatchSummary};
use serde::Serialize;

/// Parameters of one headless match.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub seed: u64,
    pub seconds: f64,
    pub fps: u32,
    /// Request a player unit every this many seconds.
    pub player_every: Option<f64>,
    /// Print the text rendering every N frames.
    pub render_every: Option<u64>,
}

/// What a headless match produced.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub frames: u64,
    pub outcome: Option<Outcome>,
    pub state_hash: u64,
    pub summary: MatchSummary,
    pub events: Vec<MatchEvent>,
}

/// Drive a match with synthetic timestamps at a fixed frame rate.
///
/// Stops after `seconds` of host time or on the frame the match ends.
pub fn run(config: MatchConfig, options: &RunOptions) -> Result<RunReport, ConfigError> {
    let fps = options.fps.max(1);
    let frame_ms = 1000.0 / f64::from(fps);
    let total_frames = (options.seconds * f64::from(fps)).ceil().max(0.0) as u64;

    let battlefield = Battlefield::with_seed(config, options.seed)?;
    let mut driver = FrameDriver::new(battlefield, DebugTextRenderer::new());
    let mut events = Vec::new();
    let mut next_player_at = options.player_every.filter(|s| *s > 0.0);
    let mut frames = 0;

    // Frame 0 only primes the clock.
    for index in 0..=total_frames {
        let now_ms = index as f64 * frame_ms;

        match (next_player_at, options.player_every) {
            (Some(at), Some(every)) if now_ms / 1000.0 >= at => {
                driver.apply(Action::SpawnUnit(Side::Player));
                next_player_at = Some(at + every);
            }
            _ => {}
        }

        let frame = driver.frame(now_ms);
        frames += 1;
        if options
            .render_every
            .is_some_and(|n| n > 0 && index % n == 0)
        {
            println!("{}", frame.output);
        }
        events.extend(frame.events);

        if frame.phase.outcome().is_some() {
            tracing::info!(frame = index, "match ended, stopping");
            break;
        }
    }

    let battlefield = driver.battlefield();
    Ok(RunReport {
        frames,
        outcome: battlefield.phase().outcome(),
        state_hash: battlefield.state_hash(),
        summary: MatchInspector::summary(battlefield),
        events,
    })
}
