//! CLI command handlers.

pub mod check;
pub mod groups;
pub mod show;

pub use check::{CheckCommandInput, run_check};
pub use groups::run_groups;
pub use show::run_show;
