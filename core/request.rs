use crate::{
	field::{Field, FieldKind, FieldValue},
	schema::SchemaRevision,
};
use pima_deps::{lexical, serde_json};
use std::collections::BTreeMap;
use thiserror::Error;

/// The measurements from one form submission. A new request is built for every submission and dropped once its result is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionRequest {
	pub pregnancies: i64,
	pub glucose: f64,
	pub blood_pressure: f64,
	pub skin_thickness: f64,
	pub insulin: f64,
	pub bmi: f64,
	pub diabetes_pedigree_function: f64,
	pub age: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
	#[error("{0} is required")]
	Missing(Field),
	#[error("{0} must be a number")]
	NotANumber(Field),
	#[error("{0} must be a whole number")]
	NotAnInteger(Field),
	#[error("{field} must be between {min} and {max}")]
	OutOfRange {
		field: Field,
		min: String,
		max: String,
	},
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid input: {}", .errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
	pub errors: Vec<FieldError>,
}

impl Default for PredictionRequest {
	fn default() -> PredictionRequest {
		let mut request = PredictionRequest {
			pregnancies: 0,
			glucose: 0.0,
			blood_pressure: 0.0,
			skin_thickness: 0.0,
			insulin: 0.0,
			bmi: 0.0,
			diabetes_pedigree_function: 0.0,
			age: 0,
		};
		for field in Field::all() {
			request.set(*field, field.default_value());
		}
		request
	}
}

impl PredictionRequest {
	/// Parse and range check the values submitted by the form, keyed by input name. Errors for every field are collected rather than stopping at the first one.
	pub fn from_form(params: &BTreeMap<String, String>) -> Result<PredictionRequest, ValidationError> {
		let mut request = PredictionRequest::default();
		let mut errors = Vec::new();
		for field in Field::all() {
			let value = params
				.get(field.spec().name)
				.map(|value| value.trim())
				.filter(|value| !value.is_empty());
			let value = match value {
				Some(value) => value,
				None => {
					errors.push(FieldError::Missing(*field));
					continue;
				}
			};
			match parse_value(*field, value) {
				Ok(value) => request.set(*field, value),
				Err(error) => errors.push(error),
			}
		}
		if errors.is_empty() {
			Ok(request)
		} else {
			Err(ValidationError { errors })
		}
	}

	/// Check every field against its bounds.
	pub fn validate(&self) -> Result<(), ValidationError> {
		let errors: Vec<FieldError> = Field::all()
			.iter()
			.filter_map(|field| check_range(*field, self.get(*field)).err())
			.collect();
		if errors.is_empty() {
			Ok(())
		} else {
			Err(ValidationError { errors })
		}
	}

	pub fn get(&self, field: Field) -> FieldValue {
		match field {
			Field::Pregnancies => FieldValue::Integer(self.pregnancies),
			Field::Glucose => FieldValue::Decimal(self.glucose),
			Field::BloodPressure => FieldValue::Decimal(self.blood_pressure),
			Field::SkinThickness => FieldValue::Decimal(self.skin_thickness),
			Field::Insulin => FieldValue::Decimal(self.insulin),
			Field::Bmi => FieldValue::Decimal(self.bmi),
			Field::DiabetesPedigreeFunction => FieldValue::Decimal(self.diabetes_pedigree_function),
			Field::Age => FieldValue::Integer(self.age),
		}
	}

	pub fn set(&mut self, field: Field, value: FieldValue) {
		let integer = match value {
			FieldValue::Integer(value) => value,
			FieldValue::Decimal(value) => value as i64,
		};
		let decimal = value.as_f64();
		match field {
			Field::Pregnancies => self.pregnancies = integer,
			Field::Glucose => self.glucose = decimal,
			Field::BloodPressure => self.blood_pressure = decimal,
			Field::SkinThickness => self.skin_thickness = decimal,
			Field::Insulin => self.insulin = decimal,
			Field::Bmi => self.bmi = decimal,
			Field::DiabetesPedigreeFunction => self.diabetes_pedigree_function = decimal,
			Field::Age => self.age = integer,
		}
	}

	/// The JSON object sent to the prediction API. It has exactly one key per field, named by `schema`.
	pub fn payload(&self, schema: SchemaRevision) -> serde_json::Map<String, serde_json::Value> {
		Field::all()
			.iter()
			.map(|field| (schema.key(*field).to_owned(), self.get(*field).to_json()))
			.collect()
	}
}

fn parse_value(field: Field, value: &str) -> Result<FieldValue, FieldError> {
	let value = match field.spec().kind {
		FieldKind::Integer => match lexical::parse::<i64, _>(value) {
			Ok(value) => FieldValue::Integer(value),
			Err(_) => {
				return Err(match lexical::parse::<f64, _>(value) {
					Ok(value) if value.is_finite() && value.fract() != 0.0 => {
						FieldError::NotAnInteger(field)
					}
					// A whole number too large for an i64.
					Ok(value) if value.is_finite() => out_of_range(field),
					_ => FieldError::NotANumber(field),
				})
			}
		},
		FieldKind::Decimal => match lexical::parse::<f64, _>(value) {
			Ok(value) if value.is_finite() => FieldValue::Decimal(value),
			_ => return Err(FieldError::NotANumber(field)),
		},
	};
	check_range(field, value)?;
	Ok(value)
}

fn check_range(field: Field, value: FieldValue) -> Result<(), FieldError> {
	if field.spec().contains(value.as_f64()) {
		Ok(())
	} else {
		Err(out_of_range(field))
	}
}

fn out_of_range(field: Field) -> FieldError {
	let spec = field.spec();
	FieldError::OutOfRange {
		field,
		min: spec.format_min(),
		max: spec.format_max(),
	}
}
