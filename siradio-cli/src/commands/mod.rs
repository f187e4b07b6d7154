//! Subcommands of the `siradio` binary

pub mod decode;
pub mod encode;
pub mod listen;
