extern crate sdl2;

pub mod render;

use anyhow::{Context, Result};
use balls::capture::{CaptureConfig, FfmpegWriter, Recorder};
use balls::{init_simulation, FrameClock, GenerationConfig, SimulationConfig};
use log::{info, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use render::DisplayConfig;
use sdl2::event::Event;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopped,
}

fn init_logging() -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .context("Invalid logging config")?;
    log4rs::init_config(config).context("Failed to install logger")?;
    Ok(())
}

pub fn main() -> Result<()> {
    init_logging()?;

    // Setup.
    let simulation_config = SimulationConfig::default();
    let display_config = DisplayConfig::default();
    let generation_config = GenerationConfig {
        width: display_config.width,
        height: display_config.height,
        row_y: (display_config.height / 2) as f64,
        ..GenerationConfig::default()
    };
    let capture_config = CaptureConfig {
        frame_rate: simulation_config.frame_rate,
        width: display_config.width,
        height: display_config.height,
        ..CaptureConfig::default()
    };

    let mut graphics = render::init_graphics(display_config)?;
    let mut event_pump = graphics.event_pump()?;
    let mut simulation = init_simulation(&generation_config, simulation_config);

    let mut recorder = Recorder::new(capture_config.frame_budget());
    if capture_config.record_on_start {
        recorder.start(FfmpegWriter::open(&capture_config)?);
    }

    let mut clock = FrameClock::new(simulation.config.frame_rate);
    let mut state = LoopState::Running;
    while state == LoopState::Running {
        for event in event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                state = LoopState::Stopped;
            }
        }

        simulation.step();
        graphics.draw(&simulation)?;

        // Read back before presenting; the back buffer is undefined afterwards.
        let frame = if recorder.is_recording() {
            Some(graphics.read_frame()?)
        } else {
            None
        };
        graphics.present();
        if let Some(frame) = frame {
            if recorder.record(&frame)? {
                info!("Recording saved to {}", capture_config.path.display());
            }
        }

        clock.tick();
    }

    recorder.finish()?;
    info!("Window closed after {} frames", simulation.frame);
    Ok(())
}
