//! Prediction models

use std::collections::{BTreeMap, HashMap};

use housing_core::logic::features::LayoutInfo;
use housing_core::logic::pipeline::FormField;
use housing_core::{Advisory, Evaluation, FeatureVector, FieldInput, PredictionResult, Review};
use serde::{Deserialize, Serialize};

/// Body of `/api/v1/review` and `/api/v1/predict`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    /// Field name → number, or "Yes"/"No" for flag fields. Omitted fields take their default.
    #[serde(default)]
    pub inputs: HashMap<String, FieldInput>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub advisories: Vec<Advisory>,
    pub features: BTreeMap<String, f64>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            advisories: review.advisories,
            features: named(&review.vector),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: PredictionResult,
    pub advisories: Vec<Advisory>,
    pub features: BTreeMap<String, f64>,
}

impl From<Evaluation> for PredictResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            features: named(&evaluation.vector),
            prediction: evaluation.prediction,
            advisories: evaluation.advisories,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub title: &'static str,
    pub fields: Vec<FormField>,
    pub layout: LayoutInfo,
}

fn named(vector: &FeatureVector) -> BTreeMap<String, f64> {
    vector
        .named_values()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
