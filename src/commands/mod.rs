pub mod init;
pub mod synthesize;
