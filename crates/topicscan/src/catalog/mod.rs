pub mod codec;
pub mod source;
pub mod store;

pub use codec::{decode, encode};
pub use source::{load_catalog, parse_catalog};
pub use store::{Catalog, RESERVED_SEPARATORS};
