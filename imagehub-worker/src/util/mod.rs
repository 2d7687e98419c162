//! Small runtime helpers shared by the binary.

pub mod shutdown;

pub use shutdown::shutdown_signal;
