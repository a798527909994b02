//! Shared utilities: Arrow array helpers, table file I/O and logging.

pub mod arrow;
pub mod io;
pub mod logging;

pub use self::io::{TableFormat, read_table, write_table};
