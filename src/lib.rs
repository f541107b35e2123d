pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod reconcile;
pub mod table;
