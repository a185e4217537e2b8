mod cli_args;
pub mod cli_ops;

pub use cli_args::{App, HerdfenceAppArguments};
