//! Pipeline Context - collector → outlier guard → inference adapter
//!
//! Built once at startup from the artifacts and shared read-only afterwards.
//! A context only exists if every artifact loaded and agreed on the layout,
//! so holding one means the service is ready.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::baseline::{self, Advisory, BaselineError, StatsTable};
use super::config::PipelineConfig;
use super::features::{
    CollectError, FeatureCollector, FeatureDomain, FeatureVector, FieldInput, LayoutInfo,
    FEATURE_LAYOUT, FLAG_CHOICES,
};
use super::model::{
    load_engine, EngineKind, InferenceAdapter, InferenceEngine, InferenceError, PredictionResult,
    StandardScaler,
};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum PipelineError {
    /// Reference dataset could not be turned into statistics
    Baseline(BaselineError),
    /// Model / scaler failure (load time or request time)
    Inference(InferenceError),
    /// Submission rejected by the collector
    InvalidInput(CollectError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Baseline(e) => write!(f, "{}", e),
            PipelineError::Inference(e) => write!(f, "{}", e),
            PipelineError::InvalidInput(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Baseline(e) => Some(e),
            PipelineError::Inference(e) => Some(e),
            PipelineError::InvalidInput(e) => Some(e),
        }
    }
}

impl From<BaselineError> for PipelineError {
    fn from(err: BaselineError) -> Self {
        PipelineError::Baseline(err)
    }
}

impl From<InferenceError> for PipelineError {
    fn from(err: InferenceError) -> Self {
        PipelineError::Inference(err)
    }
}

impl From<CollectError> for PipelineError {
    fn from(err: CollectError) -> Self {
        PipelineError::InvalidInput(err)
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub engine: EngineKind,
    pub input_width: usize,
    /// SHA-256 of the model file (None for in-memory engines)
    pub model_sha256: Option<String>,
    pub scaler_path: String,
    pub dataset_path: String,
    pub reference_samples: usize,
    pub layout: LayoutInfo,
    pub loaded_at: DateTime<Utc>,
}

/// One form input, in layout order
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub description: &'static str,
    pub domain: FeatureDomain,
    pub step: f64,
    pub default: f64,
    /// Flag fields only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<[&'static str; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_choice: Option<&'static str>,
    pub mean: f64,
    pub std: f64,
}

/// Collected vector plus advisories, without running the model
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub vector: FeatureVector,
    pub advisories: Vec<Advisory>,
}

/// Full pipeline output for one submission
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub vector: FeatureVector,
    pub advisories: Vec<Advisory>,
    pub prediction: PredictionResult,
}

// ============================================================================
// CONTEXT
// ============================================================================

pub struct PipelineContext {
    stats: StatsTable,
    collector: FeatureCollector,
    adapter: InferenceAdapter,
    metadata: ModelMetadata,
}

impl PipelineContext {
    /// Load every artifact named by `config`; any failure leaves the service unready
    pub fn load(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let stats = baseline::load_stats(&config.dataset_path)?;
        let scaler = StandardScaler::load(&config.scaler_path)?;
        let engine = load_engine(&config.model_path)?;
        let checksum = file_sha256(&config.model_path)?;

        let mut context = Self::from_parts(stats, scaler, engine)?;
        context.metadata.model_path = config.model_path.display().to_string();
        context.metadata.model_sha256 = Some(checksum);
        context.metadata.scaler_path = config.scaler_path.display().to_string();
        context.metadata.dataset_path = config.dataset_path.display().to_string();

        log::info!(
            "Pipeline ready: {} model {} (sha256 {})",
            context.metadata.engine,
            context.metadata.model_path,
            context.metadata.model_sha256.as_deref().unwrap_or("-")
        );

        Ok(context)
    }

    /// Assemble from already-loaded parts
    pub fn from_parts(
        stats: StatsTable,
        scaler: StandardScaler,
        engine: Box<dyn InferenceEngine>,
    ) -> Result<Self, PipelineError> {
        baseline::validate_stats(&stats)?;

        let engine_kind = engine.kind();
        let input_width = engine.input_width();
        let adapter = InferenceAdapter::new(scaler, engine)?;
        let collector = FeatureCollector::from_stats(&stats);

        let metadata = ModelMetadata {
            model_path: "<memory>".to_string(),
            engine: engine_kind,
            input_width,
            model_sha256: None,
            scaler_path: "<memory>".to_string(),
            dataset_path: "<memory>".to_string(),
            reference_samples: stats.samples,
            layout: LayoutInfo::current(),
            loaded_at: Utc::now(),
        };

        Ok(Self { stats, collector, adapter, metadata })
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    pub fn collector(&self) -> &FeatureCollector {
        &self.collector
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Form inputs with their defaults, in layout order
    pub fn form_schema(&self) -> Vec<FormField> {
        FEATURE_LAYOUT
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let default = self.collector.default_for(i).unwrap_or(0.0);
                let stats = self.stats.get(i).copied().unwrap_or_default();
                let is_flag = spec.domain == FeatureDomain::Flag;

                FormField {
                    name: spec.name,
                    description: spec.description,
                    domain: spec.domain,
                    step: spec.domain.step(),
                    default,
                    choices: is_flag.then_some(FLAG_CHOICES),
                    default_choice: if is_flag { FLAG_CHOICES.get(default as usize).copied() } else { None },
                    mean: stats.mean,
                    std: stats.std,
                }
            })
            .collect()
    }

    /// Validate and check a submission for outliers
    pub fn review(&self, inputs: &HashMap<String, FieldInput>) -> Result<Review, PipelineError> {
        let vector = self.collector.collect(inputs)?;
        let advisories = baseline::inspect(&self.stats, &vector);
        Ok(Review { vector, advisories })
    }

    /// Validate, check for outliers, and predict; advisories never block
    pub fn evaluate(&self, inputs: &HashMap<String, FieldInput>) -> Result<Evaluation, PipelineError> {
        let Review { vector, advisories } = self.review(inputs)?;
        let prediction = self.predict(&vector)?;
        Ok(Evaluation { vector, advisories, prediction })
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, PipelineError> {
        Ok(self.adapter.predict(vector)?)
    }
}

fn file_sha256(path: &Path) -> Result<String, InferenceError> {
    let bytes = std::fs::read(path)
        .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::baseline::{flag, FieldStats};
    use crate::logic::features::layout::{feature_names, FEATURE_COUNT};
    use crate::logic::model::PRICE_MULTIPLIER;

    const DATASET: &str = "\
CRIM,ZN,INDUS,CHAS,NOX,RM,AGE,DIS,RAD,TAX,PTRATIO,B,LSTAT,MEDV
0.00632,18.0,2.31,0,0.538,6.575,65.2,4.0900,1,296,15.3,396.90,4.98,24.0
0.02731,0.0,7.07,0,0.469,6.421,78.9,4.9671,2,242,17.8,396.90,9.14,21.6
0.02729,0.0,7.07,0,0.469,7.185,61.1,4.9671,2,242,17.8,392.83,4.03,34.7
0.03237,0.0,2.18,0,0.458,6.998,45.8,6.0622,3,222,18.7,394.63,2.94,33.4
0.06905,0.0,2.18,0,0.458,7.147,54.2,6.0622,3,222,18.7,396.90,5.33,36.2
0.08829,12.5,7.87,0,0.524,6.012,66.6,5.5605,5,311,15.2,395.60,12.43,22.9
0.62976,0.0,8.14,0,0.538,5.949,61.8,4.7075,4,307,21.0,396.90,8.26,20.4
0.17331,0.0,9.69,1,0.585,5.707,54.0,2.3817,6,391,19.2,396.90,12.01,21.8
";

    /// Artifacts written to a temp dir; scaler fitted on the dataset itself
    fn write_artifacts(dir: &Path) -> PipelineConfig {
        let stats = baseline::stats_from_reader(DATASET.as_bytes()).unwrap();
        let names: Vec<String> = feature_names().map(String::from).collect();
        let mean: Vec<f64> = stats.fields().iter().map(|f| f.mean).collect();
        let scale: Vec<f64> = stats.fields().iter().map(|f| f.std).collect();

        let mut coefficients = vec![0.3; FEATURE_COUNT];
        coefficients[5] = 2.7; // RM
        coefficients[12] = -3.7; // LSTAT

        let config = PipelineConfig {
            model_path: dir.join("boston_model.json"),
            scaler_path: dir.join("boston_scaler.json"),
            dataset_path: dir.join("boston.csv"),
        };

        std::fs::write(&config.dataset_path, DATASET).unwrap();
        std::fs::write(
            &config.scaler_path,
            serde_json::json!({ "feature_names": names, "mean": mean, "scale": scale }).to_string(),
        )
        .unwrap();
        std::fs::write(
            &config.model_path,
            serde_json::json!({ "coefficients": coefficients, "intercept": 22.53 }).to_string(),
        )
        .unwrap();

        config
    }

    fn means_input(context: &PipelineContext) -> HashMap<String, FieldInput> {
        context
            .form_schema()
            .into_iter()
            .filter(|f| f.domain == FeatureDomain::Continuous)
            .map(|f| (f.name.to_string(), FieldInput::Number(f.mean)))
            .collect()
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path());
        let context = PipelineContext::load(&config).unwrap();

        let meta = context.metadata();
        assert_eq!(meta.engine, EngineKind::Linear);
        assert_eq!(meta.input_width, FEATURE_COUNT);
        assert_eq!(meta.reference_samples, 8);
        assert_eq!(meta.model_sha256.as_ref().map(|s| s.len()), Some(64));
        assert!(meta.model_path.ends_with("boston_model.json"));
    }

    #[test]
    fn test_mean_vector_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let context = PipelineContext::load(&write_artifacts(dir.path())).unwrap();

        let evaluation = context.evaluate(&means_input(&context)).unwrap();
        let prediction = evaluation.prediction;

        assert!(prediction.value_thousands.is_finite());
        assert!(prediction.value_thousands >= 0.0);
        assert_eq!(prediction.price_usd, prediction.value_thousands * PRICE_MULTIPLIER);

        let formatted = &prediction.formatted_price;
        assert!(formatted.starts_with('$'));
        let (whole, cents) = formatted[1..].split_once('.').unwrap();
        assert!(whole.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(cents.len(), 2);
        assert!(evaluation.advisories.is_empty());
    }

    #[test]
    fn test_repeated_predictions_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let context = PipelineContext::load(&write_artifacts(dir.path())).unwrap();
        let vector = context.collector().defaults();

        let first = context.predict(&vector).unwrap().value_thousands;
        for _ in 0..10 {
            assert_eq!(context.predict(&vector).unwrap().value_thousands, first);
        }
    }

    #[test]
    fn test_outlier_flagged_but_prediction_still_returned() {
        let dir = tempfile::tempdir().unwrap();
        let context = PipelineContext::load(&write_artifacts(dir.path())).unwrap();

        let crim = *context.stats().get_by_name("CRIM").unwrap();
        assert!(crim.std > 0.0);
        let extreme = crim.mean + 10.0 * crim.std;
        assert!(flag(extreme, crim.mean, crim.std));

        let mut inputs = means_input(&context);
        inputs.insert("CRIM".to_string(), FieldInput::Number(extreme));
        let evaluation = context.evaluate(&inputs).unwrap();

        assert_eq!(evaluation.advisories.len(), 1);
        assert_eq!(evaluation.advisories[0].feature, "CRIM");
        assert_eq!(evaluation.vector.get_by_name("CRIM"), Some(extreme));
        assert!(evaluation.prediction.value_thousands.is_finite());
    }

    #[test]
    fn test_invalid_input_never_reaches_inference() {
        let dir = tempfile::tempdir().unwrap();
        let context = PipelineContext::load(&write_artifacts(dir.path())).unwrap();

        let mut inputs = HashMap::new();
        inputs.insert("RAD".to_string(), FieldInput::Number(2.5));
        match context.evaluate(&inputs) {
            Err(PipelineError::InvalidInput(e)) => assert_eq!(e.errors[0].feature, "RAD"),
            other => panic!("Expected InvalidInput, got {:?}", other.map(|e| e.prediction)),
        }
    }

    #[test]
    fn test_form_schema() {
        let dir = tempfile::tempdir().unwrap();
        let context = PipelineContext::load(&write_artifacts(dir.path())).unwrap();
        let schema = context.form_schema();

        let names: Vec<&str> = schema.iter().map(|f| f.name).collect();
        assert_eq!(names, feature_names().collect::<Vec<_>>());

        let chas = &schema[3];
        assert_eq!(chas.choices, Some(["No", "Yes"]));
        assert_eq!(chas.default_choice, Some("No"));

        let rm = &schema[5];
        assert_eq!(rm.step, 1.0);
        assert_eq!(rm.default, rm.mean.round());
        assert_eq!(schema[0].step, 0.1);
    }

    #[test]
    fn test_missing_artifacts_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path());

        let no_model = PipelineConfig { model_path: dir.path().join("nope.onnx"), ..config.clone() };
        assert!(matches!(
            PipelineContext::load(&no_model),
            Err(PipelineError::Inference(InferenceError::NotFound(_)))
        ));

        let no_scaler = PipelineConfig { scaler_path: dir.path().join("nope.json"), ..config.clone() };
        assert!(matches!(
            PipelineContext::load(&no_scaler),
            Err(PipelineError::Inference(InferenceError::NotFound(_)))
        ));

        let no_dataset = PipelineConfig { dataset_path: dir.path().join("nope.csv"), ..config };
        assert!(matches!(PipelineContext::load(&no_dataset), Err(PipelineError::Baseline(_))));
    }

    #[test]
    fn test_from_parts_rejects_foreign_stats() {
        let mut stats = StatsTable::from_stats([FieldStats::new(1.0, 1.0); FEATURE_COUNT]).unwrap();
        stats.feature_version += 1;

        let scaler = StandardScaler::new(&[0.0; FEATURE_COUNT], &[1.0; FEATURE_COUNT]).unwrap();
        let engine = crate::logic::model::LinearEngine::new(vec![0.0; FEATURE_COUNT], 1.0).unwrap();

        let result = PipelineContext::from_parts(stats, scaler, Box::new(engine));
        assert!(matches!(result, Err(PipelineError::Baseline(BaselineError::LayoutMismatch { .. }))));
    }
}
