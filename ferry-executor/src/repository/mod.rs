//! Repository layer
//!
//! Repositories are thin adapters over the remote services the executor
//! depends on. They hold no business logic and no per-run state.
//!
//! Every repository is a trait so the services above them can be driven by
//! in-memory doubles in tests.

mod execution;
mod identity;
mod logs;
mod object_store;

// Re-export traits
pub use execution::ExecutionService;
pub use identity::IdentityService;
pub use logs::LogService;
pub use object_store::ObjectStore;

// Re-export implementations
pub use execution::HttpExecutionService;
pub use identity::HttpIdentityService;
pub use logs::HttpLogService;
pub use object_store::HttpObjectStore;

// Re-export value types
pub use execution::{TaskDescription, TaskPage};
