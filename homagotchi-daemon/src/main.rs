//! Homagotchi - presence-aware ambient e-ink clock
//!
//! Host daemon for a Raspberry Pi behind a 2.13" e-ink panel. Pings each
//! household member's phone, shows a face per person next to the time and
//! puts the panel to sleep while nobody is home.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration};
use log::{error, info, warn};
use static_cell::StaticCell;

use homagotchi_core::state::Household;
use homagotchi_core::traits::Clock;

use crate::panel::PbmPanel;
use crate::probe::PingProbe;
use crate::tasks::SharedHousehold;
use crate::time::SystemClock;

mod channels;
mod config;
mod logger;
mod panel;
mod probe;
mod tasks;
mod time;

/// Longest shutdown waits for display ownership before skipping cleanup
const RELEASE_TIMEOUT: Duration = Duration::from_secs(1);

// Shared by both tasks for the life of the process
static HOUSEHOLD: StaticCell<SharedHousehold> = StaticCell::new();

#[derive(Parser)]
#[command(name = "homagotchi")]
#[command(about = "Presence-aware ambient e-ink clock", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./homagotchi.toml, else the built-in household)
    #[arg(short, long, env = "HOMAGOTCHI_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let cli = Cli::parse();

    let settings = match config::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("homagotchi: {}", e);
            process::exit(1);
        }
    };

    if cli.check {
        println!(
            "{}: {} persons, configuration OK",
            settings.source,
            settings.household.persons.len()
        );
        process::exit(0);
    }

    if let Err(e) = logger::init(&settings.output) {
        eprintln!("homagotchi: {}", e);
        process::exit(1);
    }

    info!("Homagotchi starting with {}", settings.source);

    let panel = PbmPanel::new(&settings.output.frame_file);
    info!("Writing frames to {}", panel.path().display());

    let household = HOUSEHOLD.init(Household::new(
        &settings.household,
        panel,
        SystemClock.now(),
    ));
    let household: &'static SharedHousehold = household;

    if let Err(e) = household.bring_up_display().await {
        error!("Display initialization failed: {}", e);
        process::exit(1);
    }

    if let Err(e) = ctrlc::set_handler(|| channels::SHUTDOWN.signal(())) {
        error!("Cannot install interrupt handler: {}", e);
        process::exit(1);
    }

    let timing = settings.household.timing;
    if let Err(e) = spawner.spawn(tasks::power_task(household, timing)) {
        error!("Cannot start display power task: {:?}", e);
        process::exit(1);
    }
    if let Err(e) = spawner.spawn(tasks::presence_task(household, PingProbe::new(), timing)) {
        error!("Cannot start presence task: {:?}", e);
        process::exit(1);
    }

    match select(channels::SHUTDOWN.wait(), channels::FATAL.wait()).await {
        Either::First(()) => {
            shutdown(household).await;
            process::exit(0);
        }
        Either::Second(e) => {
            error!("Stopping on display error: {}", e);
            log::logger().flush();
            process::exit(1);
        }
    }
}

/// Release the panel once, if it can be owned within `RELEASE_TIMEOUT`
async fn shutdown(household: &SharedHousehold) {
    info!("ctrl + c: releasing display");
    match with_timeout(RELEASE_TIMEOUT, household.display()).await {
        Ok(mut display) => display.release(),
        Err(_) => warn!("Display still busy, exiting without releasing it"),
    }
    log::logger().flush();
}
