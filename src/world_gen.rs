use log::info;
use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::ops::Range;

use crate::{
    ball::Ball,
    boundary::Boundary,
    color::hsv_to_rgb,
    color::height_hue,
    simulation::{Simulation, SimulationConfig},
};

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub ball_count: usize,
    /// Height of the starting row.
    pub row_y: f64,
    pub velocity_x: Range<f64>,
    pub velocity_y: Range<f64>,
    /// Fixed seed for a reproducible scene; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            width: 800,
            height: 800,
            ball_count: 300,
            row_y: 400.,
            velocity_x: -2.0..2.0,
            velocity_y: -1.0..1.0,
            seed: None,
        }
    }
}

pub fn init_simulation(config: &GenerationConfig, simulation_config: SimulationConfig) -> Simulation {
    let boundary = Boundary::for_canvas(config.width, config.height);
    let mut rng = match config.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };
    let balls = create_balls_horizontal(config, &simulation_config, &boundary, &mut rng);
    info!(
        "Created {} of {} balls inside boundary at ({}, {}) r={}",
        balls.len(),
        config.ball_count,
        boundary.center.x,
        boundary.center.y,
        boundary.radius
    );
    Simulation::new(simulation_config, boundary, balls)
}

/// Lays `ball_count` evenly spaced slots across the canvas at `row_y` and
/// puts a ball in each slot that is inside the boundary.
///
/// Colors follow the row's height; velocities are random per axis.
pub fn create_balls_horizontal<R: Rng>(
    config: &GenerationConfig,
    simulation_config: &SimulationConfig,
    boundary: &Boundary,
    rng: &mut R,
) -> Vec<Ball> {
    let diameter = simulation_config.diameter();
    let x_spacing = config.width as f64 / (config.ball_count + 1) as f64;
    let y = config.row_y;
    let hue = height_hue(y, config.height as f64, diameter);
    let color = hsv_to_rgb(hue, 1., 1.);

    let mut balls = Vec::with_capacity(config.ball_count);
    for i in 0..config.ball_count {
        let position = Vector2::new((i + 1) as f64 * x_spacing, y);
        if !boundary.contains(&position, diameter) {
            continue;
        }
        let velocity = Vector2::new(
            rng.gen_range(config.velocity_x.clone()),
            rng.gen_range(config.velocity_y.clone()),
        );
        balls.push(Ball::new(position, velocity, color));
    }
    balls
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rng() -> Pcg64 {
        Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96)
    }

    #[test]
    fn default_row_is_clipped_to_the_circle() {
        let config = GenerationConfig::default();
        let simulation_config = SimulationConfig::default();
        let boundary = Boundary::for_canvas(config.width, config.height);
        let balls = create_balls_horizontal(&config, &simulation_config, &boundary, &mut rng());

        // The row crosses the center, so the usable chord is 2 * 254px wide
        // out of 800px, sampled every 800/301 px.
        let spacing = 800. / 301.;
        let expected = (1..=300)
            .filter(|i| (*i as f64 * spacing - 400.).abs() <= 254.)
            .count();
        assert_eq!(balls.len(), expected);
        assert!(balls.len() < 300);
        for ball in &balls {
            assert_eq!(ball.position.y, 400.);
            assert!(boundary.contains(&ball.position, simulation_config.diameter()));
            assert!(config.velocity_x.contains(&ball.velocity.x));
            assert!(config.velocity_y.contains(&ball.velocity.y));
        }
    }

    #[test]
    fn row_color_follows_height() {
        let config = GenerationConfig::default();
        let simulation_config = SimulationConfig::default();
        let boundary = Boundary::for_canvas(config.width, config.height);
        let balls = create_balls_horizontal(&config, &simulation_config, &boundary, &mut rng());
        let expected = hsv_to_rgb(400. / 788. * 300., 1., 1.);
        assert!(balls.iter().all(|b| b.color == expected));
    }

    #[test]
    fn row_outside_circle_is_empty() {
        let config = GenerationConfig {
            row_y: 20.,
            ..GenerationConfig::default()
        };
        let simulation_config = SimulationConfig::default();
        let boundary = Boundary::for_canvas(config.width, config.height);
        let balls = create_balls_horizontal(&config, &simulation_config, &boundary, &mut rng());
        assert!(balls.is_empty());
    }

    #[test]
    fn seeded_scenes_repeat() {
        let config = GenerationConfig {
            seed: Some(7),
            ..GenerationConfig::default()
        };
        let a = init_simulation(&config, SimulationConfig::default());
        let b = init_simulation(&config, SimulationConfig::default());
        assert_eq!(a, b);
        assert_eq!(a.frame, 0);
        assert!(!a.balls.is_empty());
    }

    proptest! {
        #[test]
        fn never_more_than_requested(count in 0usize..400, row_y in 0.0f64..800.0, seed in any::<u64>()) {
            let config = GenerationConfig {
                ball_count: count,
                row_y,
                ..GenerationConfig::default()
            };
            let simulation_config = SimulationConfig::default();
            let boundary = Boundary::for_canvas(config.width, config.height);
            let mut rng = Pcg64::seed_from_u64(seed);
            let balls = create_balls_horizontal(&config, &simulation_config, &boundary, &mut rng);
            prop_assert!(balls.len() <= count);
            for ball in &balls {
                prop_assert!(boundary.contains(&ball.position, simulation_config.diameter()));
            }
        }
    }
}
