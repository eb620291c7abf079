// Core module - Command/response synchronization
pub mod assembler;
pub mod deadline;
pub mod session;
pub mod source;

pub use assembler::{LineAssembler, LineEvent};
pub use deadline::Deadline;
pub use session::{run_command, CommandSession, SessionState};
pub use source::ByteSource;
