use crate::{request::PredictionRequest, result::PredictionResult, schema::SchemaRevision};
use pima_deps::{
	log,
	reqwest::{self, StatusCode},
	serde_json,
	url::Url,
};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://pimapy-api.onrender.com/predict";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
	pub url: Url,
	pub schema: SchemaRevision,
	pub timeout: Duration,
}

/// The ways a submission can fail. Each one ends the submission, nothing is retried.
#[derive(Debug, Error)]
pub enum PredictError {
	/// The API answered with a non-2xx status.
	#[error("Prediction failed: {detail}")]
	Http { status: u16, detail: String },
	/// The request never got a complete response, for example the connection was refused or timed out.
	#[error("API request failed: {0}")]
	Network(String),
	#[error("An unexpected error occurred: {0}")]
	Unexpected(String),
}

pub struct PredictionClient {
	http: reqwest::Client,
	options: ClientOptions,
}

impl PredictionClient {
	pub fn new(options: ClientOptions) -> Result<PredictionClient, PredictError> {
		let http = reqwest::Client::builder()
			.timeout(options.timeout)
			.build()
			.map_err(|error| PredictError::Unexpected(error.to_string()))?;
		Ok(PredictionClient { http, options })
	}

	pub fn options(&self) -> &ClientOptions {
		&self.options
	}

	/// Send one request to the prediction API and read the label and probability from its response.
	pub async fn predict(
		&self,
		request: &PredictionRequest,
	) -> Result<PredictionResult, PredictError> {
		let schema = self.options.schema;
		let payload = request.payload(schema);
		log::debug!(
			"POST {} ({} schema): {}",
			self.options.url,
			schema,
			serde_json::Value::Object(payload.clone())
		);
		let response = self
			.http
			.post(self.options.url.clone())
			.json(&payload)
			.send()
			.await
			.map_err(network_error)?;
		let status = response.status();
		let body = response.text().await.map_err(network_error)?;
		if !status.is_success() {
			let detail = error_detail(status, &body);
			log::warn!("prediction API responded {}: {}", status, detail);
			return Err(PredictError::Http {
				status: status.as_u16(),
				detail,
			});
		}
		let body: serde_json::Value = serde_json::from_str(&body).map_err(|error| {
			PredictError::Unexpected(format!("the response was not valid JSON: {}", error))
		})?;
		let result = PredictionResult::from_response(&body, schema)?;
		log::debug!("prediction: {}", result.message());
		Ok(result)
	}
}

fn network_error(error: reqwest::Error) -> PredictError {
	log::warn!("prediction API request failed: {}", error);
	PredictError::Network(error.to_string())
}

/// Prefer the `detail` member the API puts in its error bodies, then the raw body, then the status reason.
fn error_detail(status: StatusCode, body: &str) -> String {
	match serde_json::from_str::<serde_json::Value>(body) {
		Ok(serde_json::Value::Object(body)) => match body.get("detail") {
			Some(serde_json::Value::String(detail)) => detail.clone(),
			Some(detail) => detail.to_string(),
			None => "Unknown error".to_owned(),
		},
		_ if !body.trim().is_empty() => body.trim().to_owned(),
		_ => format!(
			"{} {}",
			status.as_u16(),
			status.canonical_reason().unwrap_or("unknown status")
		),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{result::Outcome, Field};
	use pima_deps::{http, hyper, serde_json::json};
	use std::{
		collections::BTreeSet,
		sync::{Arc, Mutex},
	};

	struct StubApi {
		status: u16,
		body: String,
		delay: Option<Duration>,
		requests: Mutex<Vec<serde_json::Value>>,
	}

	async fn handle(
		stub: Arc<Arc<StubApi>>,
		request: http::Request<hyper::Body>,
	) -> http::Response<hyper::Body> {
		let body = hyper::body::to_bytes(request.into_body()).await.unwrap();
		let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
		stub.requests.lock().unwrap().push(body);
		if let Some(delay) = stub.delay {
			tokio::time::delay_for(delay).await;
		}
		let mut response = http::Response::new(hyper::Body::from(stub.body.clone()));
		*response.status_mut() = http::StatusCode::from_u16(stub.status).unwrap();
		response
	}

	fn start(status: u16, body: &str, delay: Option<Duration>) -> (Url, Arc<StubApi>) {
		let stub = Arc::new(StubApi {
			status,
			body: body.to_owned(),
			delay,
			requests: Mutex::new(Vec::new()),
		});
		let (addr, server) = pima_util::serve::bind(
			std::net::Ipv4Addr::LOCALHOST.into(),
			0,
			stub.clone(),
			handle,
		)
		.unwrap();
		tokio::spawn(server);
		let url = Url::parse(&format!("http://{}/predict", addr)).unwrap();
		(url, stub)
	}

	fn client(url: Url, schema: SchemaRevision, timeout: Duration) -> PredictionClient {
		PredictionClient::new(ClientOptions {
			url,
			schema,
			timeout,
		})
		.unwrap()
	}

	#[tokio::test]
	async fn test_sends_one_request_with_schema_keys() {
		let (url, stub) = start(
			200,
			r#"{"prediction": "Non-Diabetic", "probability_diabetic": 0.21}"#,
			None,
		);
		let client = client(url, SchemaRevision::Current, Duration::from_secs(5));
		let result = client.predict(&PredictionRequest::default()).await.unwrap();
		assert_eq!(result.outcome(), Outcome::Positive);
		assert_eq!(result.probability, Some(json!(0.21)));
		let requests = stub.requests.lock().unwrap();
		assert_eq!(requests.len(), 1);
		let keys: BTreeSet<&str> = requests[0]
			.as_object()
			.unwrap()
			.keys()
			.map(|key| key.as_str())
			.collect();
		let expected: BTreeSet<&str> = Field::all()
			.iter()
			.map(|field| SchemaRevision::Current.key(*field))
			.collect();
		assert_eq!(keys, expected);
		assert_eq!(requests[0]["Glucose"], json!(148.0));
		assert_eq!(requests[0]["Pregnancies"], json!(6));
	}

	#[tokio::test]
	async fn test_initial_schema_reads_probability() {
		let (url, stub) = start(200, r#"{"prediction": "Diabetic", "probability": "0.77"}"#, None);
		let client = client(url, SchemaRevision::Initial, Duration::from_secs(5));
		let result = client.predict(&PredictionRequest::default()).await.unwrap();
		assert_eq!(result.outcome(), Outcome::Cautionary);
		insta::assert_snapshot!(result.message(), @"Prediction: Diabetic (Probability: 0.77)");
		let requests = stub.requests.lock().unwrap();
		assert_eq!(requests[0]["skin_thickness"], json!(35.0));
	}

	#[tokio::test]
	async fn test_http_error_uses_detail() {
		let (url, _stub) = start(500, r#"{"detail": "Model not loaded"}"#, None);
		let client = client(url, SchemaRevision::Current, Duration::from_secs(5));
		let error = client.predict(&PredictionRequest::default()).await.unwrap_err();
		match &error {
			PredictError::Http { status, detail } => {
				assert_eq!(*status, 500);
				assert_eq!(detail, "Model not loaded");
			}
			error => panic!("unexpected error kind: {:?}", error),
		}
		insta::assert_snapshot!(error.to_string(), @"Prediction failed: Model not loaded");
	}

	#[tokio::test]
	async fn test_http_error_without_detail() {
		let (url, _stub) = start(422, r#"{"error": "bad keys"}"#, None);
		let client = client(url, SchemaRevision::Current, Duration::from_secs(5));
		let error = client.predict(&PredictionRequest::default()).await.unwrap_err();
		insta::assert_snapshot!(error.to_string(), @"Prediction failed: Unknown error");
		let (url, _stub) = start(502, "Bad Gateway from proxy", None);
		let client = self::client(url, SchemaRevision::Current, Duration::from_secs(5));
		let error = client.predict(&PredictionRequest::default()).await.unwrap_err();
		insta::assert_snapshot!(error.to_string(), @"Prediction failed: Bad Gateway from proxy");
	}

	#[test]
	fn test_error_detail() {
		let detail = error_detail(
			StatusCode::UNPROCESSABLE_ENTITY,
			r#"{"detail": [{"loc": ["body", "Age"], "msg": "field required"}]}"#,
		);
		assert_eq!(
			detail,
			r#"[{"loc":["body","Age"],"msg":"field required"}]"#
		);
		assert_eq!(
			error_detail(StatusCode::SERVICE_UNAVAILABLE, ""),
			"503 Service Unavailable"
		);
	}

	#[tokio::test]
	async fn test_connection_refused_is_a_network_error() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);
		let url = Url::parse(&format!("http://{}/predict", addr)).unwrap();
		let client = client(url, SchemaRevision::Current, Duration::from_secs(5));
		let error = client.predict(&PredictionRequest::default()).await.unwrap_err();
		match error {
			PredictError::Network(_) => {}
			error => panic!("unexpected error kind: {:?}", error),
		}
	}

	#[tokio::test]
	async fn test_timeout_is_a_network_error() {
		let (url, _stub) = start(200, "{}", Some(Duration::from_secs(2)));
		let client = client(url, SchemaRevision::Current, Duration::from_millis(100));
		let error = client.predict(&PredictionRequest::default()).await.unwrap_err();
		match error {
			PredictError::Network(_) => {}
			error => panic!("unexpected error kind: {:?}", error),
		}
	}

	#[tokio::test]
	async fn test_malformed_success_body_is_unexpected() {
		let (url, _stub) = start(200, "<html>ok</html>", None);
		let client = client(url, SchemaRevision::Current, Duration::from_secs(5));
		let error = client.predict(&PredictionRequest::default()).await.unwrap_err();
		match &error {
			PredictError::Unexpected(_) => {}
			error => panic!("unexpected error kind: {:?}", error),
		}
		assert!(error
			.to_string()
			.starts_with("An unexpected error occurred: the response was not valid JSON"));
	}
}
