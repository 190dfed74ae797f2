mod attribution_store;
mod click_store;
mod conversion_store;

pub use attribution_store::InMemoryAttributionStore;
pub use click_store::InMemoryClickStore;
pub use conversion_store::InMemoryConversionStore;
