pub mod id;
pub mod money;
pub mod prelude;
pub mod time;
