//! Filter binlog2sql UPDATE statements and generate flashback SQL.
//!
//! `flashback-sql` drives [`flashback_sql_core`] over a whole file of
//! binlog2sql output:
//! - Filtering removes the unchanged columns binlog2sql writes into every
//!   UPDATE
//! - Flashback produces the statements that undo the original ones
//! - Full flashback inverts every UPDATE column, changed or not
//!
//! # CLI Usage
//!
//! ```bash
//! # Keep only the columns that changed
//! flashback-sql -f binlog.sql -o filtered.sql
//!
//! # Generate rollback SQL, keeping `tenant_id` in every WHERE clause
//! flashback-sql -f binlog.sql --flashback -k tenant_id -o rollback.sql
//!
//! # Show every mode for one statement
//! flashback-sql --sql "UPDATE t SET \`a\`=2 WHERE \`a\`=1 LIMIT 1;"
//! ```

pub mod driver;
pub mod error;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::driver::{
        count_statements, preview, process, run_file, Options, Progress, Summary, TracingSink,
    };
    pub use crate::error::{DriverError, Result};
    pub use flashback_sql_core::{Mode, RewriteConfig, Rewriter};
}
