//! HTTP CRUD Service
//!
//! Maps verbs on `/todos` and `/todos/:id` to storage operations, always
//! scoped to the identity the middleware resolved. Ownership checks precede
//! every mutation; a record that exists but belongs to someone else is
//! indistinguishable from one that does not exist.

pub mod handlers;
pub mod protocol;
pub mod rate_limit;
