pub mod catalog;
pub mod errors;
pub mod memory;
pub mod model;
pub mod prelude;
pub mod recorder;
pub mod resolver;
pub mod store;
