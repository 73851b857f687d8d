use nalgebra::Vector2;

/// The circle every ball is kept inside of.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl Boundary {
    /// Boundary centered on a `width` x `height` canvas, with a radius of a
    /// third of the shorter side. Center and radius are whole pixels.
    pub fn for_canvas(width: u32, height: u32) -> Boundary {
        Boundary {
            center: Vector2::new((width / 2) as f64, (height / 2) as f64),
            radius: (width.min(height) / 3) as f64,
        }
    }

    pub fn contains(&self, point: &Vector2<f64>, diameter: f64) -> bool {
        inside_boundary(point, &self.center, self.radius, diameter)
    }

    pub fn reflect(&self, position: &Vector2<f64>, velocity: &Vector2<f64>) -> Vector2<f64> {
        reflect(&self.center, position, velocity)
    }
}

/// Whether `point` is within `radius - diameter` of `center`, edge included.
///
/// The diameter margin keeps a ball's drawn edge inside the drawn circle
/// rather than just its center.
pub fn inside_boundary(
    point: &Vector2<f64>,
    center: &Vector2<f64>,
    radius: f64,
    diameter: f64,
) -> bool {
    let limit = radius - diameter;
    (point - center).norm_squared() <= limit * limit
}

/// Mirrors `velocity` about the circle normal at `position`.
///
/// `position` must not equal `center`; the normal is undefined there. A ball
/// that is outside the boundary can never sit at its center, so the update
/// step never hits that case.
pub fn reflect(
    center: &Vector2<f64>,
    position: &Vector2<f64>,
    velocity: &Vector2<f64>,
) -> Vector2<f64> {
    let normal = (position - center).normalize();
    velocity - normal * (2. * velocity.dot(&normal))
}
