//! housing-predict - one-shot prediction from the command line
//!
//! ```text
//! housing-predict CRIM=0.2 RM=7 CHAS=Yes
//! ```
//!
//! Fields not given take their historical default. Artifact locations come
//! from `HOUSING_MODEL_PATH`, `HOUSING_SCALER_PATH`, `HOUSING_DATASET_PATH`.

use std::collections::HashMap;
use std::process::ExitCode;

use housing_core::constants::{APP_NAME, APP_VERSION};
use housing_core::{FieldInput, PipelineConfig, PipelineContext, PipelineError};

fn parse_args(args: impl Iterator<Item = String>) -> Result<HashMap<String, FieldInput>, String> {
    let mut inputs = HashMap::new();

    for arg in args {
        let (name, raw) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", arg))?;

        let value = match raw.parse::<f64>() {
            Ok(n) => FieldInput::Number(n),
            Err(_) => FieldInput::Choice(raw.to_string()),
        };
        inputs.insert(name.to_string(), value);
    }

    Ok(inputs)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let inputs = match parse_args(std::env::args().skip(1)) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let config = PipelineConfig::from_env();
    let context = match PipelineContext::load(&config) {
        Ok(context) => context,
        Err(e) => {
            log::error!("Artifacts failed to load, cannot serve predictions: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match context.evaluate(&inputs) {
        Ok(evaluation) => {
            for advisory in &evaluation.advisories {
                println!("warning: {}", advisory.message);
            }
            println!("Predicted median home value: {}", evaluation.prediction.formatted_price);
            ExitCode::SUCCESS
        }
        Err(PipelineError::InvalidInput(e)) => {
            for field in &e.errors {
                eprintln!("{}: {}", field.feature, field.reason);
            }
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("Prediction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
