use crate::Context;
use pima_deps::hyper::{Body, Request, Response, StatusCode};
use pima_util::error::Result;

/// The server has no backing store, so it is healthy whenever it can answer.
pub async fn get(_context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let response = Response::builder()
		.status(StatusCode::OK)
		.body(Body::from("ok"))?;
	Ok(response)
}
