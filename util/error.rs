pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Create an ad-hoc [`Error`] from a format string.
#[macro_export]
macro_rules! err {
	($($t:tt)*) => {
		$crate::error::Error::from(format!($($t)*))
	};
}

#[test]
fn test_err() {
	let error = err!("failed to bind port {}", 8080);
	assert_eq!(error.to_string(), "failed to bind port 8080");
}
