use log::debug;
use nalgebra::Vector2;
use std::time::{Duration, Instant};

use crate::{ball::Ball, boundary::Boundary};

/// Physics constants, fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Added to every ball's velocity each frame, in pixels/frame².
    pub gravity: Vector2<f64>,
    pub ball_radius: f64,
    /// Multiplier on the velocity after a bounce. 1 keeps bounces elastic.
    pub energy_loss_factor: f64,
    pub frame_rate: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            gravity: Vector2::new(0., 0.1),
            ball_radius: 6.,
            energy_loss_factor: 1.,
            frame_rate: 60,
        }
    }
}

impl SimulationConfig {
    pub fn diameter(&self) -> f64 {
        2. * self.ball_radius
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    pub config: SimulationConfig,
    pub boundary: Boundary,
    pub balls: Vec<Ball>,
    /// Number of completed steps.
    pub frame: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig, boundary: Boundary, balls: Vec<Ball>) -> Simulation {
        Simulation {
            config,
            boundary,
            balls,
            frame: 0,
        }
    }

    /// Advances every ball by one frame. Balls don't interact, so the order
    /// of updates doesn't matter.
    pub fn step(&mut self) {
        for ball in self.balls.iter_mut() {
            ball.update(&self.boundary, &self.config);
        }
        self.frame += 1;
    }
}

/// Caps the loop at a fixed tick rate by sleeping out the rest of each tick.
#[derive(Debug)]
pub struct FrameClock {
    frame_time: Duration,
    last_tick: Instant,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> FrameClock {
        FrameClock {
            frame_time: Duration::from_nanos(1_000_000_000 / frame_rate.max(1) as u64),
            last_tick: Instant::now(),
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Blocks until a full frame time has passed since the previous tick and
    /// returns how long the frame's work took. An overrun frame doesn't wait.
    pub fn tick(&mut self) -> Duration {
        let busy = self.last_tick.elapsed();
        debug!("Frame time: {} ms", busy.as_millis());
        if let Some(remaining) = self.frame_time.checked_sub(busy) {
            std::thread::sleep(remaining);
        }
        self.last_tick = Instant::now();
        busy
    }
}
