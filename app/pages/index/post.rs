use super::page::{render, Notice, Props};
use crate::{error::Error, Context};
use pima_core::PredictionRequest;
use pima_deps::{
	hyper::{self, header, Body, Request, Response, StatusCode},
	log, serde_urlencoded,
};
use pima_util::error::Result;
use std::collections::BTreeMap;

pub async fn post(context: &Context, mut request: Request<Body>) -> Result<Response<Body>> {
	let is_form = request
		.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|content_type| content_type.to_str().ok())
		.and_then(|content_type| content_type.split(';').next())
		.map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
		.unwrap_or(false);
	if !is_form {
		return Err(Error::BadRequest.into());
	}
	let data = hyper::body::to_bytes(request.body_mut())
		.await
		.map_err(|_| Error::BadRequest)?;
	let params: BTreeMap<String, String> =
		serde_urlencoded::from_bytes(&data).map_err(|_| Error::BadRequest)?;
	// Invalid values never reach the prediction API.
	let notice = match PredictionRequest::from_form(&params) {
		Err(error) => Notice::Invalid(error.errors.iter().map(|e| e.to_string()).collect()),
		Ok(prediction_request) => match context.client.predict(&prediction_request).await {
			Ok(result) => {
				log::info!("{}", result.message());
				Notice::Prediction(result)
			}
			Err(error) => Notice::Failed(error.to_string()),
		},
	};
	let html = render(Props::submitted(&params, notice));
	let response = Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "text/html; charset=utf-8")
		.body(Body::from(html))?;
	Ok(response)
}
