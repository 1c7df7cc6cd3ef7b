use crate::{client::PredictError, schema::SchemaRevision};
use pima_deps::serde_json;

/// Shown in place of a value the API left out of its response.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq)]
pub struct PredictionResult {
	pub label: String,
	/// The probability exactly as the API returned it, which may be a number or a string.
	pub probability: Option<serde_json::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
	/// The patient was classified as non-diabetic.
	Positive,
	Cautionary,
}

impl PredictionResult {
	pub fn from_response(
		body: &serde_json::Value,
		schema: SchemaRevision,
	) -> Result<PredictionResult, PredictError> {
		let body = body.as_object().ok_or_else(|| {
			PredictError::Unexpected(format!("expected a JSON object in the response, got {}", body))
		})?;
		let label = match body.get(schema.label_key()) {
			Some(serde_json::Value::String(label)) => label.clone(),
			Some(label) => label.to_string(),
			None => NOT_AVAILABLE.to_owned(),
		};
		let probability = body.get(schema.probability_key()).cloned();
		Ok(PredictionResult { label, probability })
	}

	pub fn outcome(&self) -> Outcome {
		if self.label.to_lowercase() == "non-diabetic" {
			Outcome::Positive
		} else {
			Outcome::Cautionary
		}
	}

	pub fn probability_text(&self) -> String {
		match &self.probability {
			Some(serde_json::Value::String(probability)) => probability.clone(),
			Some(probability) => probability.to_string(),
			None => NOT_AVAILABLE.to_owned(),
		}
	}

	pub fn message(&self) -> String {
		format!(
			"Prediction: {} (Probability: {})",
			self.label,
			self.probability_text()
		)
	}
}
