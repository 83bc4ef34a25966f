use clap::Parser;
use dotenvy::dotenv;

use ride_offer_calculator::app::{resolve_locale, OfferRequest, RideCalculator};
use ride_offer_calculator::backend::FileBackend;
use ride_offer_calculator::cli::{Cli, Command, EvaluateArgs};
use ride_offer_calculator::config::Config;
use ride_offer_calculator::engine::FeeTable;
use ride_offer_calculator::error::AppError;
use ride_offer_calculator::logging::init_logging;
use ride_offer_calculator::render;
use ride_offer_calculator::store::HistoryStore;

fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env().map_err(AppError::Config)?;
    let history_dir = cli.history_dir.unwrap_or(config.history_dir);
    tracing::debug!(history_dir = %history_dir.display(), "Using history directory");

    let backend = FileBackend::new(history_dir);
    let locale = resolve_locale(&backend, cli.locale, config.locale);
    let mut calculator = RideCalculator::new(
        HistoryStore::open(backend),
        FeeTable::default(),
        config.defaults,
    );

    match cli.command {
        Command::Evaluate(args) => {
            // A failed save is already logged by the calculator.
            let outcome = calculator.evaluate_offer(&offer_request(&args), !args.no_save)?;
            print!(
                "{}",
                render::render_result(
                    locale,
                    &outcome.evaluation.metrics,
                    outcome.evaluation.recommendation,
                    outcome.input.min_hourly_rate,
                )
            );
        }
        Command::History => {
            print!("{}", render::render_history(locale, calculator.history().entries()));
        }
        Command::Clear => {
            calculator.history_mut().clear()?;
            println!("{}", render::history_cleared(locale));
        }
        Command::Presets => {
            print!("{}", render::render_presets(locale, calculator.fee_table()));
        }
    }

    Ok(())
}

fn offer_request(args: &EvaluateArgs) -> OfferRequest {
    OfferRequest {
        offer_amount: args.offer,
        distance_km: args.distance,
        duration_minutes: args.duration,
        traffic: args.traffic,
        traffic_multiplier: args.traffic_multiplier,
        operating_cost_per_km: args.cost_per_km,
        min_hourly_rate: args.min_hourly,
        platform: args.platform,
        fee_percent: args.fee,
    }
}
