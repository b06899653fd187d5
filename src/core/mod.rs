//! Process-wide state shared by commands.

mod state;

pub use state::{begin_work, end_work, is_shutdown, register_server, setup_shutdown_handler};
