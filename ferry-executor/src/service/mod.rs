//! Service layer
//!
//! Services hold the executor's business logic. Each one drives a single
//! stage of a run (artifact transfer, definition building, submission,
//! result retrieval, cancellation) on top of the repository ports.

mod artifact;
mod cancellation;
mod definition;
mod retriever;
mod submitter;

pub use artifact::ArtifactStore;
pub use cancellation::{DEFAULT_CANCEL_REASON, cancel_task};
pub use definition::build_definition;
pub use retriever::ResultRetriever;
pub use submitter::TaskSubmitter;
