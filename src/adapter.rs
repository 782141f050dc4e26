pub mod fs;
pub mod ssh;
