use nalgebra::Vector2;

use crate::{boundary::Boundary, color::Rgb, simulation::SimulationConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub color: Rgb,
}

impl Ball {
    pub fn new(position: Vector2<f64>, velocity: Vector2<f64>, color: Rgb) -> Ball {
        Ball {
            position,
            velocity,
            color,
        }
    }

    /// Advances the ball by one frame.
    ///
    /// If the next position would leave the boundary the ball stays where it
    /// is and only its velocity is reflected; the move is retried along the
    /// new direction on the following frame.
    pub fn update(&mut self, boundary: &Boundary, config: &SimulationConfig) {
        self.velocity += config.gravity;
        let next_position = self.position + self.velocity;
        if boundary.contains(&next_position, config.diameter()) {
            self.position = next_position;
        } else {
            self.velocity =
                boundary.reflect(&next_position, &self.velocity) * config.energy_loss_factor;
        }
    }
}
