// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`control`] defines the `ProcessControl` trait the session drives and
//!   its production implementation, `RealProcessControl`.
//! - [`launcher`] forks the stages of a job into one process group.
//! - [`wait`] waits synchronously on a foreground group.
//! - [`argv`], [`pipes`] and [`redirect`] prepare, before `fork`, the data
//!   each child needs.

pub mod argv;
pub mod control;
pub mod launcher;
pub mod pipes;
pub mod redirect;
pub mod wait;

pub use argv::ArgvBuffer;
pub use control::{
    ExitStatus, LaunchRequest, Launched, ProcessControl, RealProcessControl, StagePlan,
    WaitOutcome,
};
pub use pipes::PipeSet;
pub use redirect::PreparedRedirects;
