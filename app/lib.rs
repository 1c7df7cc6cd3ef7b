/*!
The prediction form served over HTTP. `GET /` renders the form, `POST /` validates a submission, forwards it to the prediction API and renders the form again with the result.
*/

use self::error::Error;
use pima_core::{ClientOptions, PredictionClient};
use pima_deps::{
	hyper::{Body, Method, Request, Response, StatusCode},
	log, tokio,
};
use pima_util::error::Result;
use std::sync::Arc;

mod error;
mod health;
mod layouts;
mod pages;

pub struct Options {
	pub host: std::net::IpAddr,
	pub port: u16,
	pub client: ClientOptions,
}

pub struct Context {
	pub client: PredictionClient,
}

impl Context {
	pub fn new(options: ClientOptions) -> Result<Context> {
		let client = PredictionClient::new(options)?;
		Ok(Context { client })
	}
}

pub async fn handle(context: Arc<Context>, request: Request<Body>) -> Response<Body> {
	let method = request.method().clone();
	let uri = request.uri().clone();
	let path = uri.path();
	let path_components: Vec<_> = path.split('/').skip(1).collect();
	let result = match (&method, path_components.as_slice()) {
		(&Method::GET, &[""]) => self::pages::index::get(&context, request).await,
		(&Method::POST, &[""]) => self::pages::index::post(&context, request).await,
		(&Method::GET, &["health"]) => self::health::get(&context, request).await,
		_ => Err(Error::NotFound.into()),
	};
	let response = match result {
		Ok(response) => response,
		Err(error) => {
			if let Some(error) = error.downcast_ref::<Error>() {
				match error {
					Error::BadRequest => text_response(StatusCode::BAD_REQUEST, "bad request"),
					Error::NotFound => text_response(StatusCode::NOT_FOUND, "not found"),
				}
			} else {
				log::error!("{}", error);
				text_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
			}
		}
	};
	log::info!("{} {} {}", method, path, response.status().as_u16());
	response
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
	let mut response = Response::new(Body::from(body));
	*response.status_mut() = status;
	response
}

pub fn run(options: Options) -> Result<()> {
	tokio::runtime::Builder::new()
		.threaded_scheduler()
		.enable_all()
		.build()?
		.block_on(run_inner(options))
}

async fn run_inner(options: Options) -> Result<()> {
	log::info!(
		"predictions are sent to {} with the {} schema and a {}s timeout",
		options.client.url,
		options.client.schema,
		options.client.timeout.as_secs_f64(),
	);
	let context = Context::new(options.client)?;
	pima_util::serve::serve(options.host, options.port, context, handle).await
}

#[cfg(test)]
mod test {
	use super::*;
	use pima_core::{Field, SchemaRevision};
	use pima_deps::{http, reqwest, url::Url};
	use std::{
		net::{Ipv4Addr, SocketAddr},
		sync::atomic::{AtomicUsize, Ordering},
		time::Duration,
	};

	struct StubApi {
		status: u16,
		body: &'static str,
		requests: AtomicUsize,
	}

	async fn handle_stub(stub: Arc<Arc<StubApi>>, _request: Request<Body>) -> Response<Body> {
		stub.requests.fetch_add(1, Ordering::SeqCst);
		let mut response = Response::new(Body::from(stub.body));
		*response.status_mut() = http::StatusCode::from_u16(stub.status).unwrap();
		response
	}

	fn start_app(url: Url) -> SocketAddr {
		let context = Context::new(ClientOptions {
			url,
			schema: SchemaRevision::Current,
			timeout: Duration::from_secs(5),
		})
		.unwrap();
		let (addr, server) =
			pima_util::serve::bind(Ipv4Addr::LOCALHOST.into(), 0, context, handle).unwrap();
		tokio::spawn(server);
		addr
	}

	/// Start the app in front of a stub prediction API.
	fn start(status: u16, body: &'static str) -> (SocketAddr, Arc<StubApi>) {
		let stub = Arc::new(StubApi {
			status,
			body,
			requests: AtomicUsize::new(0),
		});
		let (stub_addr, stub_server) =
			pima_util::serve::bind(Ipv4Addr::LOCALHOST.into(), 0, stub.clone(), handle_stub).unwrap();
		tokio::spawn(stub_server);
		let url = Url::parse(&format!("http://{}/predict", stub_addr)).unwrap();
		(start_app(url), stub)
	}

	fn form(overrides: &[(&str, &str)]) -> Vec<(String, String)> {
		Field::all()
			.iter()
			.map(|field| {
				let spec = field.spec();
				let value = overrides
					.iter()
					.find(|(name, _)| *name == spec.name)
					.map(|(_, value)| (*value).to_owned())
					.unwrap_or_else(|| spec.format(field.default_value()));
				(spec.name.to_owned(), value)
			})
			.collect()
	}

	async fn submit(addr: SocketAddr, params: &[(String, String)]) -> (u16, String) {
		let response = reqwest::Client::new()
			.post(&format!("http://{}/", addr))
			.form(params)
			.send()
			.await
			.unwrap();
		let status = response.status().as_u16();
		(status, response.text().await.unwrap())
	}

	#[tokio::test]
	async fn test_get_renders_form_without_calling_api() {
		let (addr, stub) = start(200, r#"{"prediction": "Diabetic"}"#);
		let response = reqwest::get(&format!("http://{}/", addr)).await.unwrap();
		assert_eq!(response.status().as_u16(), 200);
		let html = response.text().await.unwrap();
		assert!(html.contains("Pima Diabetes Predictor"));
		assert!(html.contains(r#"value="148.0""#));
		assert_eq!(stub.requests.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_non_diabetic_is_a_success() {
		let (addr, stub) = start(
			200,
			r#"{"prediction": "Non-Diabetic", "probability_diabetic": 0.21}"#,
		);
		let (status, html) = submit(addr, &form(&[("glucose", "120.5")])).await;
		assert_eq!(status, 200);
		assert!(html.contains("alert-level-success"));
		assert!(html.contains("<strong>Prediction: Non-Diabetic</strong> (Probability: 0.21)"));
		assert!(html.contains(r#"value="120.5""#));
		assert_eq!(stub.requests.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_diabetic_is_a_warning() {
		let (addr, _stub) = start(200, r#"{"prediction": "Diabetic", "probability_diabetic": "0.91"}"#);
		let (_, html) = submit(addr, &form(&[])).await;
		assert!(html.contains("alert-level-warning"));
		assert!(html.contains("(Probability: 0.91)"));
	}

	#[tokio::test]
	async fn test_invalid_values_are_not_sent() {
		let (addr, stub) = start(200, r#"{"prediction": "Diabetic"}"#);
		let (status, html) = submit(addr, &form(&[("age", "90"), ("pregnancies", "x")])).await;
		assert_eq!(status, 200);
		assert!(html.contains("alert-level-danger"));
		assert!(html.contains("<li>Pregnancies must be a number</li>"));
		assert!(html.contains("<li>Age (years) must be between 21 and 81</li>"));
		assert!(html.contains(r#"value="90""#));
		assert_eq!(stub.requests.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_api_error_is_shown() {
		let (addr, stub) = start(500, r#"{"detail": "Model not loaded"}"#);
		let (status, html) = submit(addr, &form(&[])).await;
		assert_eq!(status, 200);
		assert!(html.contains("alert-level-danger"));
		assert!(html.contains("Prediction failed: Model not loaded"));
		assert_eq!(stub.requests.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_unreachable_api_is_a_network_error() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let url = Url::parse(&format!("http://{}/predict", listener.local_addr().unwrap())).unwrap();
		drop(listener);
		let addr = start_app(url);
		let (status, html) = submit(addr, &form(&[])).await;
		assert_eq!(status, 200);
		assert!(html.contains("alert-level-danger"));
		assert!(html.contains("API request failed: "));
		assert!(!html.contains("Prediction failed:"));
		assert!(!html.contains("An unexpected error occurred:"));
	}

	#[tokio::test]
	async fn test_malformed_api_response_is_unexpected() {
		let (addr, stub) = start(200, "<html>ok</html>");
		let (status, html) = submit(addr, &form(&[])).await;
		assert_eq!(status, 200);
		assert!(html.contains("alert-level-danger"));
		assert!(html.contains("An unexpected error occurred: the response was not valid JSON"));
		assert!(!html.contains("Prediction failed:"));
		assert!(!html.contains("API request failed:"));
		assert_eq!(stub.requests.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_body_that_is_not_a_form_is_rejected() {
		let (addr, stub) = start(200, r#"{"prediction": "Diabetic"}"#);
		let response = reqwest::Client::new()
			.post(&format!("http://{}/", addr))
			.header("content-type", "application/json")
			.body(r#"{"glucose": 148}"#)
			.send()
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 400);
		insta::assert_snapshot!(response.text().await.unwrap(), @"bad request");
		let response = reqwest::Client::new()
			.post(&format!("http://{}/", addr))
			.body("glucose=148")
			.send()
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 400);
		assert_eq!(stub.requests.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_health_and_not_found() {
		let (addr, _stub) = start(200, "{}");
		let response = reqwest::get(&format!("http://{}/health", addr)).await.unwrap();
		assert_eq!(response.status().as_u16(), 200);
		insta::assert_snapshot!(response.text().await.unwrap(), @"ok");
		let response = reqwest::get(&format!("http://{}/predict", addr)).await.unwrap();
		assert_eq!(response.status().as_u16(), 404);
		let response = reqwest::Client::new()
			.post(&format!("http://{}/health", addr))
			.send()
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 404);
	}
}
