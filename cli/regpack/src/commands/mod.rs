//! CLI command implementations.

pub mod compare;
pub mod convert;
pub mod image;
pub mod init;
pub mod map;
pub mod platforms;
pub mod types;
