pub use crate::catalog::{bounded, Catalog, StaticCatalog};
pub use crate::errors::AttributionError;
pub use crate::memory::{InMemoryAttributionStore, InMemoryClickStore, InMemoryConversionStore};
pub use crate::model::{
    AffiliateLink, Attribution, ClickEvent, CommissionPolicy, ConversionEvent,
};
pub use crate::recorder::ClickRecorder;
pub use crate::resolver::Resolver;
pub use crate::store::{
    AttributionStore, ClickStore, ConversionStore, IngestOutcome, RecordOutcome,
};
