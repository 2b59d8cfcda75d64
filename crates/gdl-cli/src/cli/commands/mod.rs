//! CLI command handlers.

mod fetch;
mod list;

pub use fetch::run_fetch;
pub use list::{run_list, ListArgs};
