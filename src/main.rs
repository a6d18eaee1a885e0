//! EcoPredict entry point — CLI wiring for data generation, model fitting,
//! and scenario forecasting.

use std::path::Path;
use std::process;

use chrono::{Timelike, Utc};

use ecopredict::config::ScenarioConfig;
use ecopredict::data::synth;
use ecopredict::forecast::model::SeasonalRegression;
use ecopredict::io::export::export_csv;
use ecopredict::pipeline::{AppContext, run_forecast};

/// Default number of synthetic days generated by `--generate-data`.
const DEFAULT_SYNTH_DAYS: u32 = 45;
/// Default seed for synthetic data.
const DEFAULT_SYNTH_SEED: u64 = 42;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    horizon_override: Option<u32>,
    event: bool,
    data_path: String,
    model_path: String,
    forecast_out: Option<String>,
    generate_data: bool,
    days: u32,
    seed: u64,
    fit: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("ecopredict — EV charging demand forecaster with scenario adjustment");
    eprintln!();
    eprintln!("Usage: ecopredict [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>       Load scenario from TOML config file");
    eprintln!("  --preset <name>         Use a built-in preset (normal, heatwave, cold_snap)");
    eprintln!("  --horizon <hours>       Override forecast horizon (12-168)");
    eprintln!("  --event                 Simulate a public holiday / special event");
    eprintln!("  --data <path>           History CSV path (default: charging_data.csv)");
    eprintln!("  --model <path>          Model JSON path (default: forecast_model.json)");
    eprintln!("  --forecast-out <path>   Export adjusted forecast rows to CSV");
    eprintln!("  --generate-data         Write a synthetic history CSV and exit");
    eprintln!("  --days <n>              Synthetic days for --generate-data (default: 45)");
    eprintln!("  --seed <u64>            Seed for --generate-data (default: 42)");
    eprintln!("  --fit                   Fit the model from the history CSV and exit");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                 Start the JSON API server after the initial run");
        eprintln!("  --port <u16>            API server port (default: 3000)");
    }
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the normal preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        horizon_override: None,
        event: false,
        data_path: "charging_data.csv".to_string(),
        model_path: "forecast_model.json".to_string(),
        forecast_out: None,
        generate_data: false,
        days: DEFAULT_SYNTH_DAYS,
        seed: DEFAULT_SYNTH_SEED,
        fit: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--horizon" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --horizon requires an hours argument");
                    process::exit(1);
                }
                if let Ok(h) = args[i].parse::<u32>() {
                    cli.horizon_override = Some(h);
                } else {
                    eprintln!("error: --horizon value \"{}\" is not a valid u32", args[i]);
                    process::exit(1);
                }
            }
            "--event" => {
                cli.event = true;
            }
            "--data" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --data requires a path argument");
                    process::exit(1);
                }
                cli.data_path = args[i].clone();
            }
            "--model" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --model requires a path argument");
                    process::exit(1);
                }
                cli.model_path = args[i].clone();
            }
            "--forecast-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --forecast-out requires a path argument");
                    process::exit(1);
                }
                cli.forecast_out = Some(args[i].clone());
            }
            "--generate-data" => {
                cli.generate_data = true;
            }
            "--days" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --days requires a number argument");
                    process::exit(1);
                }
                if let Ok(d) = args[i].parse::<u32>() {
                    cli.days = d;
                } else {
                    eprintln!("error: --days value \"{}\" is not a valid u32", args[i]);
                    process::exit(1);
                }
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed = s;
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--fit" => {
                cli.fit = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Writes a fresh synthetic history CSV ending at the current hour.
fn generate_data(cli: &CliArgs) {
    if cli.days == 0 {
        eprintln!("error: --days must be > 0");
        process::exit(1);
    }
    let now = Utc::now().naive_utc();
    let end = now
        .date()
        .and_hms_opt(now.hour(), 0, 0)
        .unwrap_or(now);
    let records = synth::generate(cli.days, cli.seed, end);
    if let Err(e) = synth::write_csv_file(&records, Path::new(&cli.data_path)) {
        eprintln!("error: failed to write history CSV: {e}");
        process::exit(1);
    }
    eprintln!(
        "Wrote {} synthetic hourly rows to {}",
        records.len(),
        cli.data_path
    );
}

/// Fits the model from the history CSV and writes the model JSON.
fn fit_model(cli: &CliArgs) {
    let history = match ecopredict::data::history::History::from_csv_file(Path::new(&cli.data_path))
    {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let model = match SeasonalRegression::fit(history.records()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = model.to_json_file(Path::new(&cli.model_path)) {
        eprintln!("error: {e}");
        process::exit(1);
    }
    eprintln!(
        "Fitted model on {} rows, saved to {}",
        history.len(),
        cli.model_path
    );
}

fn main() {
    env_logger::init();
    let cli = parse_args();

    if cli.generate_data {
        generate_data(&cli);
        return;
    }

    if cli.fit {
        fit_model(&cli);
        return;
    }

    // Load scenario: --scenario takes priority, then --preset, then normal
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::normal()
    };

    // Apply CLI overrides
    if let Some(h) = cli.horizon_override {
        scenario.horizon_hours = h;
    }
    if cli.event {
        scenario.event_active = true;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Load model + data, fail fast if either is missing
    let ctx = match AppContext::load(Path::new(&cli.model_path), Path::new(&cli.data_path)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("hint: run with --generate-data and then --fit first");
            process::exit(1);
        }
    };

    // Run the one-shot pipeline
    let outcome = match run_forecast(&ctx, &scenario) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    // Print per-hour rows
    for row in &outcome.rows {
        println!("{row}");
    }

    // Print summary block
    println!("\n{}", outcome.summary);

    // Export CSV if requested
    if let Some(ref path) = cli.forecast_out {
        if let Err(e) = export_csv(&outcome.rows, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Forecast written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ecopredict::api::ApiState { ctx });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(ecopredict::api::serve(state, addr));
    }
}
