pub use crate::engine::{CommissionEngine, Posting};
pub use crate::errors::CommissionError;
