// src/reaper/mod.rs

//! Asynchronous child reaper.
//!
//! The kernel runs [`handler`]'s SIGCHLD handler at arbitrary points of
//! the main flow. The handler never touches the job table: it drains
//! `waitpid` into the lock-free [`ring::EventRing`] and raises its dirty
//! flag. The session's notifier drains the ring on the main thread, where
//! all table mutation happens.

pub mod event;
pub mod handler;
pub mod ring;

pub use event::{StatusChange, StatusEvent};
pub use handler::{install, installed, reap_into};
pub use ring::EventRing;
