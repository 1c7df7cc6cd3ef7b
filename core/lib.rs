/*!
The form client for the Pima diabetes prediction API. A [`PredictionRequest`] holds the eight measurements from one form submission, [`PredictionClient`] posts them to the API using the payload keys of a [`SchemaRevision`], and [`PredictionResult`] holds the label and probability read back from the response.
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod client;
pub mod config;
pub mod field;
pub mod request;
pub mod result;
pub mod schema;

pub use self::{
	client::{ClientOptions, PredictError, PredictionClient},
	config::{ClientOverrides, Config},
	field::{Field, FieldColumn, FieldKind, FieldSpec, FieldValue},
	request::{FieldError, PredictionRequest, ValidationError},
	result::{Outcome, PredictionResult},
	schema::SchemaRevision,
};
