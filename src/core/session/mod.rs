// Session module - One command/response exchange
pub mod session;
pub mod state;

pub use session::{run_command, CommandSession};
pub use state::SessionState;
