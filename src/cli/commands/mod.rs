//! One module per subcommand.

pub mod add;
pub mod completions;
pub mod delete;
pub mod export;
pub mod generate;
pub mod import_cmd;
pub mod list;
pub mod show;
