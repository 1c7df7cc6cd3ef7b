/*!
The prediction API has been deployed with three different input contracts. A `SchemaRevision` names the payload keys, the response keys and the request timeout that go with each one.
*/

use crate::field::Field;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SchemaRevision {
	/// snake_case payload keys, probability under `probability`.
	#[serde(rename = "initial")]
	Initial,
	/// PascalCase payload keys matching the API's model input, probability under `probability`.
	#[serde(rename = "pascal-keys")]
	PascalKeys,
	/// PascalCase payload keys, probability under `probability_diabetic`.
	#[serde(rename = "current")]
	Current,
}

#[derive(Debug, Error)]
#[error("unknown schema revision \"{0}\", expected one of: initial, pascal-keys, current")]
pub struct ParseSchemaError(pub String);

impl Default for SchemaRevision {
	fn default() -> SchemaRevision {
		SchemaRevision::Current
	}
}

impl SchemaRevision {
	pub fn all() -> &'static [SchemaRevision] {
		&[
			SchemaRevision::Initial,
			SchemaRevision::PascalKeys,
			SchemaRevision::Current,
		]
	}

	pub fn name(self) -> &'static str {
		match self {
			SchemaRevision::Initial => "initial",
			SchemaRevision::PascalKeys => "pascal-keys",
			SchemaRevision::Current => "current",
		}
	}

	/// The payload key for `field`.
	pub fn key(self, field: Field) -> &'static str {
		match self {
			SchemaRevision::Initial => match field {
				Field::Pregnancies => "pregnancies",
				Field::Glucose => "glucose",
				Field::BloodPressure => "blood_pressure",
				Field::SkinThickness => "skin_thickness",
				Field::Insulin => "insulin",
				Field::Bmi => "bmi",
				Field::DiabetesPedigreeFunction => "diabetes_pedigree_function",
				Field::Age => "age",
			},
			SchemaRevision::PascalKeys | SchemaRevision::Current => match field {
				Field::Pregnancies => "Pregnancies",
				Field::Glucose => "Glucose",
				Field::BloodPressure => "BloodPressure",
				Field::SkinThickness => "SkinThickness",
				Field::Insulin => "Insulin",
				Field::Bmi => "BMI",
				Field::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
				Field::Age => "Age",
			},
		}
	}

	pub fn label_key(self) -> &'static str {
		"prediction"
	}

	pub fn probability_key(self) -> &'static str {
		match self {
			SchemaRevision::Initial | SchemaRevision::PascalKeys => "probability",
			SchemaRevision::Current => "probability_diabetic",
		}
	}

	/// The current revision allows for the API's cold starts.
	pub fn default_timeout(self) -> Duration {
		match self {
			SchemaRevision::Initial | SchemaRevision::PascalKeys => Duration::from_secs(10),
			SchemaRevision::Current => Duration::from_secs(20),
		}
	}
}

impl std::str::FromStr for SchemaRevision {
	type Err = ParseSchemaError;
	fn from_str(value: &str) -> Result<SchemaRevision, ParseSchemaError> {
		SchemaRevision::all()
			.iter()
			.copied()
			.find(|revision| revision.name() == value)
			.ok_or_else(|| ParseSchemaError(value.to_owned()))
	}
}

impl std::fmt::Display for SchemaRevision {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}
