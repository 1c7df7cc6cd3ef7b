mod get;
mod page;
mod post;

pub use self::get::get;
pub use self::post::post;
