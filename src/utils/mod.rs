//! Process setup helpers.

pub mod bootstrap;
