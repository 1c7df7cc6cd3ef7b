pub use backtrace;
pub use env_logger;
pub use futures;
pub use http;
pub use hyper;
pub use lexical;
pub use log;
pub use reqwest;
pub use serde_json;
pub use serde_urlencoded;
pub use serde_yaml;
pub use tokio;
pub use url;
