pub mod metrics;
pub mod models;
pub mod reconciler;
pub mod storage;
pub mod utils;
