mod config;
mod functions;

pub use config::RepositoryConfig;
pub use functions::{is_ownership_violation, parse_record_id, uses_identifier_cache};
