//! TOC memory adapters.

mod in_memory_toc_memory;

pub use in_memory_toc_memory::InMemoryTocMemory;
