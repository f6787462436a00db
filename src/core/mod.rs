pub mod error;
pub mod params;
pub mod value;

pub use error::{CollectionError, Result};
pub use params::{QueryParams, SKIP, TAKE};
pub use value::Value;
