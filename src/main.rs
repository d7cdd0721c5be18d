//! Webcam stress detector and mood tracker.

use affect_monitor::app::{AppConfig, GuiMode, InvertMode, MoodApp, StressApp};
use affect_monitor::capture::VideoSource;
use affect_monitor::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate stress from blink rate and pseudo heart rate
    Stress(SourceArgs),

    /// Track facial mood and export the history on exit
    Mood {
        #[command(flatten)]
        source: SourceArgs,

        /// CSV file for the mood history [default: mood_history.csv]
        #[arg(long)]
        csv: Option<PathBuf>,

        /// PNG file for the mood distribution chart [default: mood_distribution.png]
        #[arg(long)]
        chart: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process
    #[arg(short, long)]
    video: Option<String>,

    /// GUI display mode (all, none)
    #[arg(short, long)]
    gui: Option<String>,

    /// Invert image (none, x, y, xy)
    #[arg(short, long)]
    inv: Option<String>,

    /// Brightness adjustment value (0 to disable, typical: 30)
    #[arg(short, long, allow_negative_numbers = true)]
    brightness: Option<f32>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

impl SourceArgs {
    /// Merge command-line flags over the configuration file
    fn app_config(&self) -> AppConfig {
        let settings = load_settings(self.config.as_deref());

        let video_source = match &self.video {
            Some(path) => VideoSource::File(path.clone()),
            None => VideoSource::Camera(self.cam),
        };
        let gui_mode = GuiMode::from_name(self.gui.as_deref().unwrap_or(&settings.display.gui_mode));
        let invert_mode = match &self.inv {
            Some(name) => InvertMode::from_name(name),
            None => InvertMode::from_flags(settings.display.flip_x, settings.display.flip_y),
        };
        #[allow(clippy::cast_precision_loss)] // Validated to -100..=100
        let brightness = self.brightness.unwrap_or(settings.display.brightness as f32);

        AppConfig {
            video_source,
            gui_mode,
            invert_mode,
            brightness,
            settings,
        }
    }
}

fn load_settings(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };

    info!("Loading configuration from: {}", path);
    match Config::from_file(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Failed to load config file: {}. Using defaults.", e);
            Config::default()
        }
    }
}

fn init_logger(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(level));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Stress(source) => {
            init_logger(source.debug);
            info!("Affect Monitor - stress detector");

            let mut app = StressApp::new(source.app_config()).context("Failed to start stress detector")?;
            let reading = app.run()?;
            info!(
                "Final reading: stress {}%, blinks {}/min, heart {} BPM",
                reading.score, reading.blink_rate, reading.heart_rate
            );
        }
        Command::Mood { source, csv, chart } => {
            init_logger(source.debug);
            info!("Affect Monitor - mood tracker");

            let mut config = source.app_config();
            if let Some(csv) = csv {
                config.settings.export.mood_csv = csv;
            }
            if let Some(chart) = chart {
                config.settings.export.mood_chart = chart;
            }

            let mut app = MoodApp::new(config).context("Failed to start mood tracker")?;
            app.run()?;
            info!("Mood history written to {}", app.csv_path().display());
        }
    }

    Ok(())
}
