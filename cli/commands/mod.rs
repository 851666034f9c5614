pub mod compile;
pub mod completion;
pub mod debug;
pub mod init;
