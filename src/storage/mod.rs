//! Todo Record Storage
//!
//! One `TodoStore` contract, three interchangeable backends.
//!
//! ## Core Concepts
//! - **Unscoped primitives**: `read_all`/`write_all` move the entire record
//!   set; an empty store reads as an empty set, never as an error.
//! - **Owner-scoped helpers**: `list_owned`, `find_owned`, `insert`, `update`
//!   and `delete` have default implementations layered on the primitives;
//!   the relational backend overrides them to push filtering and ordering
//!   into SQL.
//! - **Id assignment**: one past the highest id in the set (1-based). Racing
//!   writers can mint duplicate ids; at single-process scale this is
//!   accepted, last writer wins.

pub mod backend;
pub mod file;
pub mod memory;
pub mod sqlite;
pub mod types;

#[cfg(test)]
mod tests;
