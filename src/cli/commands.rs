//! Commands exposed by the `parallel-features` binary.

pub mod init;
pub mod run;
pub mod split;
