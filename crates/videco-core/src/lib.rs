//! Videco Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - The async runtime
//! - Subprocess execution
//! - Filesystem side effects
//!
//! All types here describe one batch run of the encoding harness: the jobs
//! it enumerates and the per-job results it logs.

pub mod ids;
pub mod job;
pub mod naming;
pub mod result;
pub mod status;

// Re-export commonly used types
pub use ids::JobId;
pub use job::Job;
pub use naming::sweep_output_name;
pub use result::JobResult;
pub use status::JobStatus;
