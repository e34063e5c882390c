use bubbletea_rs::{MouseMotion, Program};
use clap::Parser;
use procrastinator_partner::config::{self, Config};
use procrastinator_partner::widget::Model as Widget;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about = "A click-to-toggle countdown for the thing you are putting off")]
struct Cli {
    /// Countdown length in minutes
    #[arg(short, long, default_value_t = 25)]
    minutes: u64,

    /// Extra seconds added to --minutes
    #[arg(short, long, default_value_t = 0)]
    seconds: u64,

    /// Initial task label
    #[arg(short, long, default_value = "")]
    task: String,

    /// Do not ring the terminal bell when time is up
    #[arg(long)]
    silent: bool,

    /// Write logs to this file. The terminal belongs to the UI, so nothing is
    /// logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum log level when --log-file is set
    #[arg(long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
}

impl Cli {
    fn config(&self) -> Config {
        let total = self.minutes.saturating_mul(60).saturating_add(self.seconds);
        Config::default()
            .with_duration(Duration::from_secs(total))
            .with_task(self.task.clone())
            .with_bell(!self.silent)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_max_level(cli.log_level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let config = cli.config();
    tracing::info!(
        duration_ms = config.duration.as_millis() as u64,
        task = %config.task,
        "starting"
    );
    if config::install(config).is_err() {
        tracing::warn!("configuration was already installed");
    }

    let program = Program::<Widget>::builder()
        .alt_screen(true)
        .mouse_motion(MouseMotion::Cell)
        .build()?;
    program.run().await?;

    Ok(())
}
