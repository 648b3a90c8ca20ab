//! Adapters - implementations of the ports against concrete backends.

pub mod ai;
pub mod memory;
pub mod planning;
pub mod retrieval;
pub mod storage;
