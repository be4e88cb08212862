mod error;
mod records;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use records::{decode, decode_many, record_id};
pub use traits::EntityStore;
pub use types::{ChurnClass, Collection, FilterQuery, ListQuery, SortDirection, SortSpec};
