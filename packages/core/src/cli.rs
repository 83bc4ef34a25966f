use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::engine::{Platform, TrafficLevel};
use crate::render::Locale;

/// Ride Offer Calculator CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "ride-offer-calculator",
    version,
    about = "Decide whether a rideshare trip offer is worth accepting"
)]
pub struct Cli {
    /// Display language (en or es); remembered for later runs
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// Directory holding the saved calculation history
    #[arg(long, global = true)]
    pub history_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a trip offer and save it to history
    Evaluate(EvaluateArgs),
    /// Show recent calculations
    History,
    /// Delete all saved calculations
    Clear,
    /// List platform commission presets
    Presets,
}

#[derive(Debug, Clone, Args)]
pub struct EvaluateArgs {
    /// Offer amount in currency units
    #[arg(long)]
    pub offer: f64,

    /// Trip distance in kilometres
    #[arg(long)]
    pub distance: f64,

    /// Estimated duration in minutes
    #[arg(long)]
    pub duration: f64,

    /// Traffic level (light, moderate, heavy, severe)
    #[arg(long, conflicts_with = "traffic_multiplier")]
    pub traffic: Option<TrafficLevel>,

    /// Explicit duration multiplier for traffic (>= 1)
    #[arg(long)]
    pub traffic_multiplier: Option<f64>,

    /// Operating cost per kilometre (fuel, maintenance, ...)
    #[arg(long)]
    pub cost_per_km: Option<f64>,

    /// Minimum acceptable hourly rate
    #[arg(long)]
    pub min_hourly: Option<f64>,

    /// Platform preset (indrive, uber, custom)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Platform commission in percent; required with --platform custom
    #[arg(long)]
    pub fee: Option<f64>,

    /// Do not save this calculation to history
    #[arg(long)]
    pub no_save: bool,
}
