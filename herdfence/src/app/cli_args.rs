use clap::{Parser, Subcommand};

use super::cli_ops;
use crate::error::HerdfenceError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct HerdfenceAppArguments {
    #[command(subcommand)]
    pub app: App,
}

#[derive(Subcommand)]
pub enum App {
    #[command(about = "test whether a point lies inside a region")]
    Contains {
        #[arg(long, help = "region as JSON, {lat, lng, radius} or [{lat, lng}, ...]")]
        region: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    #[command(about = "reduce a region to the center and radius sent to devices")]
    Summarize {
        #[arg(long, help = "region as JSON, {lat, lng, radius} or [{lat, lng}, ...]")]
        region: String,
    },
    #[command(about = "push a stored geofence to every device of its group (dry run)")]
    Dispatch {
        #[arg(long, help = "path to a JSON fleet snapshot")]
        fleet: String,
        #[arg(long, help = "id of the geofence to dispatch")]
        geofence: i64,
        #[arg(long, help = "path to a .toml or .json herdfence configuration")]
        config: Option<String>,
    },
    #[command(about = "record a position for a device and print the classified sample")]
    Classify {
        #[arg(long, help = "path to a JSON fleet snapshot")]
        fleet: String,
        #[arg(long, help = "device id")]
        device: i64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, help = "report the position as having no valid GPS fix")]
        no_fix: bool,
        #[arg(long, help = "path to a .toml or .json herdfence configuration")]
        config: Option<String>,
    },
    #[command(about = "print the geofence status of a device")]
    Status {
        #[arg(long, help = "path to a JSON fleet snapshot")]
        fleet: String,
        #[arg(long, help = "device id")]
        device: i64,
    },
}

impl App {
    pub fn run(&self) -> Result<(), HerdfenceError> {
        let output = match self {
            App::Contains { region, lat, lng } => cli_ops::contains(region, *lat, *lng)?,
            App::Summarize { region } => cli_ops::summarize(region)?,
            App::Dispatch {
                fleet,
                geofence,
                config,
            } => cli_ops::dispatch(fleet, *geofence, config.as_ref())?,
            App::Classify {
                fleet,
                device,
                lat,
                lng,
                no_fix,
                config,
            } => cli_ops::classify(fleet, *device, *lat, *lng, !*no_fix, config.as_ref())?,
            App::Status { fleet, device } => cli_ops::status(fleet, *device)?,
        };
        println!("{output}");
        Ok(())
    }
}
