pub mod common;
pub mod errors;
pub mod logs;
pub mod report;
