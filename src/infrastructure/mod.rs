pub mod signals;
pub mod storage;
pub mod trackers;
