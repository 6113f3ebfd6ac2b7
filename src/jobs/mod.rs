// src/jobs/mod.rs

//! Job bookkeeping.
//!
//! - [`job`] defines a single job, its members and its display lines.
//! - [`table`] owns the ordered collection of jobs and the "current job"
//!   marker used by argument-less `fg` / `bg`.
//!
//! Everything here is plain data: no signals, no processes, no IO. The
//! session applies reaper events and prints the lines produced here.

pub mod job;
pub mod table;

pub use job::{Job, JobId, JobState, Member};
pub use table::{added_line, JobTable};
