pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::HttpQueryService;
pub use crate::core::parser::ResponseParser;
pub use crate::core::session::{Outcome, QuerySession};
pub use crate::core::sorter::DisplayState;
pub use crate::domain::model::{NormalizedResult, RawPayload, Record, SortDirection};
pub use crate::domain::ports::{ConfigProvider, QueryService};
pub use crate::utils::error::{QueryError, Result};
