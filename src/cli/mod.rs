//! Command-line front end.
mod args;
mod commands;
mod types;

pub use args::{
    Args,
    Command,
};
pub use commands::run;
pub use types::CliError;
