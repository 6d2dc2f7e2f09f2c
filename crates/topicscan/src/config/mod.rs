pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_json, load_config_from_yaml, validate_config};
pub use schema::{RunConfig, TransportKind};
