//! Diagnostic commands

pub mod check;
pub mod list;
pub mod routes;
