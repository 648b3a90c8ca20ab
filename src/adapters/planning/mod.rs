//! Planning source adapters.

mod in_memory_planning_source;

pub use in_memory_planning_source::InMemoryPlanningSource;
