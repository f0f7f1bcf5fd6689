//! Stringboard database layer.
//!
//! Provides SQLite connection management and schema migrations.
//!
//! # Usage
//!
//! ```no_run
//! use stringboard::database::Database;
//!
//! let db = Database::open("stringboard.db").expect("failed to open database");
//! let scratch = Database::open_in_memory().expect("failed to open in-memory database");
//! let conn = scratch.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
