use anyhow::{anyhow, Context, Result};
use balls::{Rgb, Simulation};
use sdl2::{
    gfx::primitives::DrawRenderer, pixels::Color, pixels::PixelFormatEnum, rect::Rect,
    render::WindowCanvas, EventPump,
};

pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub title: &'static str,
    pub background: Rgb,
    pub boundary_color: Rgb,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 800,
            height: 800,
            title: "Bouncing Balls",
            background: Rgb::BLACK,
            boundary_color: Rgb::WHITE,
        }
    }
}

pub struct Graphics {
    pub config: DisplayConfig,
    pub sdl_context: sdl2::Sdl,
    pub canvas: WindowCanvas,
}

fn sdl_color(color: Rgb) -> Color {
    Color::RGB(color.r, color.g, color.b)
}

pub fn init_graphics(display_config: DisplayConfig) -> Result<Graphics> {
    let sdl_context = sdl2::init().map_err(|e| anyhow!(e)).context("Failed to init SDL")?;
    let video_subsystem = sdl_context
        .video()
        .map_err(|e| anyhow!(e))
        .context("Failed to init SDL video")?;

    let window = video_subsystem
        .window(display_config.title, display_config.width, display_config.height)
        .position_centered()
        .build()
        .context("Failed to create window")?;
    let canvas = window
        .into_canvas()
        .build()
        .context("Failed to create canvas")?;

    Ok(Graphics {
        config: display_config,
        sdl_context,
        canvas,
    })
}

impl Graphics {
    pub fn event_pump(&self) -> Result<EventPump> {
        self.sdl_context.event_pump().map_err(|e| anyhow!(e))
    }

    /// Clears the canvas and draws the boundary outline and every ball.
    /// Nothing is shown until `present`.
    pub fn draw(&mut self, simulation: &Simulation) -> Result<()> {
        self.canvas.set_draw_color(sdl_color(self.config.background));
        self.canvas.clear();

        let boundary = &simulation.boundary;
        self.canvas
            .circle(
                boundary.center.x as i16,
                boundary.center.y as i16,
                boundary.radius as i16,
                sdl_color(self.config.boundary_color),
            )
            .map_err(|e| anyhow!(e))
            .context("Failed to draw boundary")?;

        let irad = simulation.config.ball_radius as i16;
        for ball in &simulation.balls {
            self.canvas
                .filled_circle(
                    ball.position.x as i16,
                    ball.position.y as i16,
                    irad,
                    sdl_color(ball.color),
                )
                .map_err(|e| anyhow!(e))
                .context("Failed to draw ball")?;
        }
        Ok(())
    }

    /// Packed RGB24 copy of what has been drawn so far.
    pub fn read_frame(&self) -> Result<Vec<u8>> {
        self.canvas
            .read_pixels(None::<Rect>, PixelFormatEnum::RGB24)
            .map_err(|e| anyhow!(e))
            .context("Failed to read frame")
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }
}
