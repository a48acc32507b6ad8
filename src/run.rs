mod cli;
mod tui;

pub(crate) use cli::{as_cli, parse_args, shellexpand, split_categories};
pub(crate) use tui::as_tui;
