//! UI components.

pub mod dashboard;
