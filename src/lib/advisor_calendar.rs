//! Derivation and repair of advisors' monthly consultation calendars.
pub mod advisor_store;
pub mod deriver;
pub mod error;
pub mod helpers;
pub mod models;
pub mod run_tool;
pub mod validation;
