pub mod account;
pub mod action;
pub mod command;
pub mod config;
pub mod error;
pub mod fetch;
pub mod global_config;
pub mod host;
pub mod hwid;
pub mod io;
pub mod password;
pub mod paths;
pub mod registry;
pub mod sequencer;
pub mod service;
pub mod step;
pub mod steps;

pub use error::{LosError, Result};
