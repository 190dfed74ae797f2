pub mod config;
pub mod errors;
pub mod hub;
pub mod prelude;
