//! Core domain logic for coilstock.
//!
//! This crate holds everything that does not touch the network or a database:
//! the coil entity and its lifecycle invariants, the storage abstraction the
//! server's backends implement, and the error taxonomy the HTTP layer maps
//! onto status codes.

pub mod coil;
pub mod storage;
