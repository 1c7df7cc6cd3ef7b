use super::page::{render, Props};
use crate::Context;
use pima_deps::hyper::{header, Body, Request, Response, StatusCode};
use pima_util::error::Result;

pub async fn get(_context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let html = render(Props::new());
	let response = Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "text/html; charset=utf-8")
		.body(Body::from(html))?;
	Ok(response)
}
