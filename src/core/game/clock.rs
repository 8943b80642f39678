//=========================================================================
// Simulation Clock
//=========================================================================
//
// Time scale and scaled simulation time.
//
// The session advances the clock once per tick with the real frame
// duration. Gameplay time accumulates `dt * time_scale`, so a scale of 0
// freezes the simulation while ticks keep running.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::time::Duration;

use log::debug;

//=== SimulationClock =====================================================

#[derive(Debug)]
pub struct SimulationClock {
    time_scale: Cell<f32>,
    tick: Cell<u64>,
    scaled_elapsed: Cell<f64>,
}

impl SimulationClock {
    /// Creates a clock at tick 0 running at normal speed.
    pub fn new() -> Self {
        Self {
            time_scale: Cell::new(1.0),
            tick: Cell::new(0),
            scaled_elapsed: Cell::new(0.0),
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale.get()
    }

    /// Sets the time scale. Negative values are clamped to 0.
    pub fn set_time_scale(&self, scale: f32) {
        let scale = scale.max(0.0);
        if self.time_scale.replace(scale) != scale {
            debug!("Time scale set to {}", scale);
        }
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick.get()
    }

    /// Total scaled simulation time in seconds.
    pub fn scaled_elapsed(&self) -> f64 {
        self.scaled_elapsed.get()
    }

    /// Completes one tick of real duration `dt` and returns the scaled delta.
    pub fn advance(&self, dt: Duration) -> f64 {
        let scaled = dt.as_secs_f64() * f64::from(self.time_scale.get());
        self.scaled_elapsed.set(self.scaled_elapsed.get() + scaled);
        self.tick.set(self.tick.get() + 1);
        scaled
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_runs_at_normal_speed() {
        let clock = SimulationClock::new();
        assert_eq!(clock.time_scale(), 1.0);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.scaled_elapsed(), 0.0);
    }

    #[test]
    fn zero_scale_freezes_simulation_time() {
        let clock = SimulationClock::new();
        clock.advance(Duration::from_millis(500));
        clock.set_time_scale(0.0);
        let delta = clock.advance(Duration::from_millis(500));

        assert_eq!(delta, 0.0);
        assert_eq!(clock.tick(), 2);
        assert!((clock.scaled_elapsed() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn negative_scale_is_clamped() {
        let clock = SimulationClock::new();
        clock.set_time_scale(-2.0);
        assert_eq!(clock.time_scale(), 0.0);
    }
}
