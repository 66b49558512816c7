pub mod capture;
pub mod company;
pub mod config;
pub mod error;
pub mod interaction;
pub mod io;
pub mod orchestrator;
pub mod output;
pub mod parse;
pub mod paths;
pub mod prompt;
pub mod pulse;
pub mod role;
pub mod runner;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CouncilError, Result};
