pub mod config;
pub mod error;
pub mod locate;
pub mod orchestrator;
pub mod repo;
pub mod style;
pub mod terminal;
