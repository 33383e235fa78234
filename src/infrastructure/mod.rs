pub mod processor;
pub mod speech;
pub mod storage;
