pub mod error;
pub mod serve;
