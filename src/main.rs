use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Error};
use clap::Parser;
use log::info;
use tokio::sync::mpsc;

use laser_control::{
    color::parse_hex,
    effect::FIXED_EFFECT_DURATION,
    prelude::*,
    structure::{FileStructure, SHOWS_DIR},
};

#[derive(Parser)]
#[command(about = "Drive the laser projector")]
struct Cli {
    /// Configuration to use instead of ./config.ron
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Effect slot to run
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=20))]
    effect: Option<u8>,

    /// Run for this long in the laser colour. Without it effects use their
    /// own timing and colours.
    #[arg(short, long, value_name = "MS")]
    duration_ms: Option<u64>,

    /// Laser colour as RRGGBB
    #[arg(long, value_name = "RRGGBB", value_parser = parse_color)]
    color: Option<LaserColor>,

    /// static, full_spectrum, rave, halloween or boiler_room
    #[arg(long, value_name = "MODE", value_parser = parse_color_mode)]
    color_mode: Option<ColorMode>,

    /// Play a single show file
    #[arg(short, long, value_name = "FILE")]
    show: Option<PathBuf>,

    /// Play random shows from DIR/shows forever
    #[arg(long, value_name = "DIR")]
    shows: Option<PathBuf>,

    /// Replay a recorded drawing
    #[arg(long, value_name = "FILE")]
    drawing: Option<PathBuf>,
}

fn parse_color(s: &str) -> Result<LaserColor, String> {
    parse_hex(s).map_err(|e| e.to_string())
}

fn parse_color_mode(s: &str) -> Result<ColorMode, String> {
    ColorMode::parse_from_str(s).ok_or_else(|| {
        let modes = ColorMode::ALL.map(ColorMode::as_str);
        format!("unknown colour mode {}, expected one of {}", s, modes.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    #[cfg(feature = "pi")]
    let sink: Box<dyn LaserSink + Send> = Box::new(UartSink::init(&config.link)?);
    #[cfg(not(feature = "pi"))]
    let sink: Box<dyn LaserSink + Send> = Box::new(LogSink::default());

    let mut controller = LaserController::init(&config, sink)?;

    let (message_queue_tx, message_queue_rx) = mpsc::channel(100);
    let controller_handle = tokio::spawn(async move {
        controller.start(message_queue_rx).await;
    });

    if let Some(color) = args.color {
        message_queue_tx
            .send(InternalMessage::SetColor(Some(color)))
            .await?;
    }
    if let Some(mode) = args.color_mode {
        message_queue_tx
            .send(InternalMessage::SetColorMode(mode))
            .await?;
    }

    let duration = args.duration_ms.map(Duration::from_millis);

    if let Some(path) = &args.drawing {
        let drawing = Drawing::load(path)?;
        message_queue_tx
            .send(InternalMessage::Drawing {
                drawing,
                duration: duration.unwrap_or(FIXED_EFFECT_DURATION),
            })
            .await?;
    } else if let Some(path) = &args.show {
        let show = ShowManager::load_show_file(path)?;
        ShowManager::new(ShowMap::new(), message_queue_tx.clone())
            .play(&show)
            .await?;
    } else if let Some(dir) = &args.shows {
        FileStructure::verify(dir)?;
        let shows = ShowManager::load_shows(dir.join(SHOWS_DIR))?;
        ShowManager::new(shows, message_queue_tx.clone())
            .run_random()
            .await?;
    } else if let Some(number) = args.effect {
        let id = EffectId::from_number(number).ok_or_else(|| anyhow!("no effect {}", number))?;
        message_queue_tx
            .send(InternalMessage::Effect { id, duration })
            .await?;
    } else {
        info!("No effect chosen, running all of them");
        for id in EffectId::ALL {
            message_queue_tx
                .send(InternalMessage::Effect { id, duration })
                .await?;
        }
    }

    // The controller finishes the queue and blanks once every sender is gone
    drop(message_queue_tx);
    controller_handle.await?;

    Ok(())
}
