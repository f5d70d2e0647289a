//! CLI subcommand implementations.

pub mod add;
pub mod calc;
pub mod edit;
pub mod exchange;
pub mod list;
pub mod rate;
pub mod remove;
pub mod show;
pub mod status;
pub mod util;
