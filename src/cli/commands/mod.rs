//! Command implementations

pub mod export;
pub mod generate;
pub mod init;
pub mod regenerate;
pub mod status;
pub mod validate;
