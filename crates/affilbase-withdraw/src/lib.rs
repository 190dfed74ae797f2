pub mod backoff;
pub mod coordinator;
pub mod errors;
pub mod lock;
pub mod memory;
pub mod model;
pub mod payout;
pub mod prelude;
pub mod store;
