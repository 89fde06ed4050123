//! Routed pages.

pub mod build;
pub mod not_found;
pub mod run;
