use crate::error::Result;
use pima_deps::{backtrace::Backtrace, futures::FutureExt, http, hyper, log};
use std::{
	any::Any, cell::RefCell, convert::Infallible, future::Future, net::SocketAddr,
	panic::AssertUnwindSafe, sync::Arc,
};

thread_local! {
	// The panic hook installed by `serve` records the message and backtrace here. A request handler's panic is caught on the same thread that recorded it.
	static PANIC_MESSAGE_AND_BACKTRACE: RefCell<Option<(String, Backtrace)>> = RefCell::new(None);
}

/// Run a server on `host:port` until it fails. Each request is passed to `request_handler` along with a shared reference to `request_handler_context`. A panic in the handler becomes a 500 response carrying the panic message and backtrace.
pub async fn serve<C, H, F>(
	host: std::net::IpAddr,
	port: u16,
	request_handler_context: C,
	request_handler: H,
) -> Result<()>
where
	C: Send + Sync + 'static,
	H: Fn(Arc<C>, http::Request<hyper::Body>) -> F + Send + Sync + 'static,
	F: Future<Output = http::Response<hyper::Body>> + Send,
{
	// Install a panic hook that will record the panic message and backtrace if a panic occurs.
	let hook = std::panic::take_hook();
	std::panic::set_hook(Box::new(|panic_info| {
		let value = (panic_info.to_string(), Backtrace::new());
		PANIC_MESSAGE_AND_BACKTRACE
			.try_with(|panic_message_and_backtrace| {
				panic_message_and_backtrace.borrow_mut().replace(value);
			})
			.ok();
	}));
	let (addr, server) = bind(host, port, request_handler_context, request_handler)?;
	log::info!("🚀 serving on port {}", addr.port());
	let result = server.await;
	std::panic::set_hook(hook);
	result?;
	Ok(())
}

/// Bind a listener without starting to serve. The returned address carries the actual port, which matters when `port` is 0.
pub fn bind<C, H, F>(
	host: std::net::IpAddr,
	port: u16,
	request_handler_context: C,
	request_handler: H,
) -> Result<(SocketAddr, impl Future<Output = hyper::Result<()>>)>
where
	C: Send + Sync + 'static,
	H: Fn(Arc<C>, http::Request<hyper::Body>) -> F + Send + Sync + 'static,
	F: Future<Output = http::Response<hyper::Body>> + Send,
{
	// Wrap the request handler and context with Arc to allow sharing a reference to it with each task.
	let request_handler = Arc::new(request_handler);
	let request_handler_context = Arc::new(request_handler_context);
	let service = hyper::service::make_service_fn(move |_| {
		let request_handler = request_handler.clone();
		let request_handler_context = request_handler_context.clone();
		async move {
			Ok::<_, Infallible>(hyper::service::service_fn(move |request| {
				let request_handler = request_handler.clone();
				let request_handler_context = request_handler_context.clone();
				async move { service(request_handler, request_handler_context, request).await }
			}))
		}
	});
	let addr = SocketAddr::new(host, port);
	let server = hyper::Server::try_bind(&addr)?.serve(service);
	let addr = server.local_addr();
	Ok((addr, server))
}

async fn service<C, H, F>(
	request_handler: Arc<H>,
	request_handler_context: Arc<C>,
	request: http::Request<hyper::Body>,
) -> Result<http::Response<hyper::Body>, Infallible>
where
	C: Send + Sync + 'static,
	H: Fn(Arc<C>, http::Request<hyper::Body>) -> F + Send + Sync + 'static,
	F: Future<Output = http::Response<hyper::Body>> + Send,
{
	let method = request.method().clone();
	let path = request.uri().path().to_owned();
	let result = AssertUnwindSafe(request_handler(request_handler_context, request))
		.catch_unwind()
		.await;
	let response = result.unwrap_or_else(|panic| {
		let recorded = PANIC_MESSAGE_AND_BACKTRACE
			.try_with(|panic_message_and_backtrace| panic_message_and_backtrace.borrow_mut().take())
			.ok()
			.flatten();
		let body = match recorded {
			Some((message, backtrace)) => format!("{}\n{:?}", message, backtrace),
			None => panic_message(panic.as_ref()),
		};
		log::error!("{} {} 500", method, path);
		log::error!("{}", body);
		let mut response = http::Response::new(hyper::Body::from(body));
		*response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
		response
	});
	Ok(response)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
	if let Some(message) = panic.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.clone()
	} else {
		"panic".to_owned()
	}
}

#[cfg(test)]
mod test {
	use super::bind;
	use pima_deps::{http, hyper};
	use std::sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	};

	fn localhost() -> std::net::IpAddr {
		std::net::Ipv4Addr::LOCALHOST.into()
	}

	#[tokio::test]
	async fn test_serves_requests_with_shared_context() {
		let (addr, server) = bind(
			localhost(),
			0,
			AtomicUsize::new(0),
			|context: Arc<AtomicUsize>, _request| async move {
				let count = context.fetch_add(1, Ordering::SeqCst) + 1;
				http::Response::new(hyper::Body::from(count.to_string()))
			},
		)
		.unwrap();
		tokio::spawn(server);
		let url = format!("http://{}/", addr);
		let first = pima_deps::reqwest::get(&url).await.unwrap().text().await.unwrap();
		let second = pima_deps::reqwest::get(&url).await.unwrap().text().await.unwrap();
		assert_eq!(first, "1");
		assert_eq!(second, "2");
	}

	#[tokio::test]
	async fn test_panic_becomes_internal_server_error() {
		async fn handler(_context: Arc<()>, _request: http::Request<hyper::Body>) -> http::Response<hyper::Body> {
			panic!("handler exploded")
		}
		let (addr, server) = bind(localhost(), 0, (), handler).unwrap();
		tokio::spawn(server);
		let response = pima_deps::reqwest::get(&format!("http://{}/", addr))
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 500);
		let body = response.text().await.unwrap();
		assert!(body.contains("handler exploded"));
	}
}
