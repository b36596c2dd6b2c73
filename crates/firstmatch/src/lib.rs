pub mod cli;
pub mod error;
pub mod output;
pub mod record;
pub mod runner;
