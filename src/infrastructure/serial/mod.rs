// Serial module - Exclusive serial device access
pub mod control;
pub mod opener;
pub mod port;

pub use control::{TermiosControl, TransportControl};
pub use opener::{RetryPolicy, TransportOpener};
pub use port::{Port, SerialPort};
