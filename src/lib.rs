//! Balls bouncing under gravity inside a circle.
//!
//! The library is headless: scene setup, the physics step and video capture
//! plumbing. The window lives in the `balls` binary.

pub mod ball;
pub mod boundary;
pub mod capture;
pub mod color;
pub mod simulation;
pub mod world_gen;

pub use ball::Ball;
pub use boundary::{inside_boundary, reflect, Boundary};
pub use color::{hsv_to_rgb, Rgb};
pub use simulation::{FrameClock, Simulation, SimulationConfig};
pub use world_gen::{create_balls_horizontal, init_simulation, GenerationConfig};
