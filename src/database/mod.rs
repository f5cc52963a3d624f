pub mod cosmos;
pub mod memory;
pub mod query_builder;
pub mod reading;
pub mod store;

pub use cosmos::CosmosStore;
pub use memory::MemoryStore;
pub use query_builder::{QueryParameter, QuerySpec, ReadingQuery};
pub use reading::Reading;
pub use store::{ReadingStore, StoreError};
