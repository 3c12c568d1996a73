pub mod compare;
pub mod parser;
pub mod session;
pub mod sorter;

pub use crate::domain::model::{NormalizedResult, RawPayload, Record, SortDirection};
pub use crate::domain::ports::{ConfigProvider, QueryService};
pub use crate::utils::error::Result;
