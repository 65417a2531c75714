//! tw-config: scenario file format, validation and game construction.

pub mod build;
pub mod replay;
pub mod schema;
pub mod validate;

pub use build::{LoadedScenario, build};
pub use replay::{ActionOutcome, ReplayReport, apply, replay};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

use std::path::Path;

use tw_core::TwError;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Game error: {0}")]
    Game(#[from] TwError),

    #[error("Unsupported file type: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json`, or `.yaml`/`.yml`.
pub fn load(path: &Path) -> ScenarioResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("yaml" | "yml") => load_yaml(path),
        _ => Err(ScenarioError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Load, validate and build a scenario file.
pub fn open(path: &Path) -> ScenarioResult<LoadedScenario> {
    let scenario = load(path)?;
    Ok(build(&scenario)?)
}
