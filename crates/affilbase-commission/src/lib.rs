pub mod engine;
pub mod errors;
pub mod prelude;
