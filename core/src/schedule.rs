use crate::*;

/// Most ticks run for a single frame; anything beyond is dropped rather than replayed.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Fixed-timestep accumulator fed with animation-frame timestamps in milliseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickAccumulator {
    last_frame: Option<f64>,
    pending_ms: f64,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
        self.pending_ms = 0.;
    }

    pub fn pending_ms(&self) -> f64 {
        self.pending_ms
    }

    /// Records a frame and returns the time elapsed since the previous one. The first frame
    /// after a reset only anchors the clock.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_frame.replace(now_ms) {
            Some(prev) if (now_ms - prev).is_finite() => (now_ms - prev).max(0.),
            _ => 0.,
        };
        self.pending_ms += elapsed;
        elapsed
    }

    /// Consumes one interval worth of accumulated time if available.
    pub fn take_tick(&mut self, interval_ms: u32) -> bool {
        let interval = f64::from(interval_ms.max(1));
        if self.pending_ms >= interval {
            self.pending_ms -= interval;
            true
        } else {
            false
        }
    }

    pub fn discard_backlog(&mut self) {
        self.pending_ms = 0.;
    }
}

/// What happened during one animation frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub ticks: u32,
    pub meals: u32,
    pub crash: Option<Crash>,
}

impl FrameReport {
    pub const fn has_update(&self) -> bool {
        self.ticks > 0
    }
}

/// Decouples the simulation rate from the display rate: call [`GameLoop::frame`] once per
/// animation frame, then render.
#[derive(Clone, Debug, PartialEq)]
pub struct GameLoop {
    clock: TickAccumulator,
    max_catch_up: u32,
}

impl GameLoop {
    pub fn new(max_catch_up: u32) -> Self {
        Self {
            clock: TickAccumulator::new(),
            max_catch_up: max_catch_up.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.clock.reset();
    }

    pub fn frame<P: FoodPlacer>(&mut self, engine: &mut GameEngine<P>, now_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();
        if !engine.phase().is_running() {
            self.clock.reset();
            return report;
        }

        self.clock.advance(now_ms);
        // re-read every time, eating speeds the game up mid-frame
        while report.ticks < self.max_catch_up && self.clock.take_tick(engine.tick_interval_ms()) {
            report.ticks += 1;
            match engine.tick() {
                TickOutcome::Ate => report.meals += 1,
                TickOutcome::GameOver(crash) => {
                    report.crash = Some(crash);
                    self.clock.reset();
                    return report;
                }
                TickOutcome::Moved | TickOutcome::Idle => {}
            }
        }

        if self.clock.pending_ms() >= f64::from(engine.tick_interval_ms()) {
            log::debug!(
                "Dropping {:.0}ms of simulation backlog",
                self.clock.pending_ms()
            );
            self.clock.discard_backlog();
        }

        report
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(MAX_CATCH_UP_TICKS)
    }
}
