mod common;
mod init;
mod validate;
mod view;

pub use common::CommonArgs;
pub use init::{InitArgs, init_config};
pub use validate::validate_config;
pub use view::{View, run_view};
