pub mod manager;
pub mod query_builder;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{SortDirection, SqlParam, SqlQuery, SqlResult};
