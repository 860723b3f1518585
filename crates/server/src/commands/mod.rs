//! Command handlers for the `modelscope-mcp` CLI.

mod inspect;
mod serve;

pub(crate) use inspect::{handle_config_command, handle_list_tools_command};
pub(crate) use serve::handle_serve_command;
