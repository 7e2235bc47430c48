//! Core library for the talentgate recruiting backend.
//!
//! Companies publish take-home assessments against their job postings;
//! candidates submit work through a short shareable link; reviewers evaluate
//! those submissions through a small decision state machine. The library holds
//! the domain workflows, their HTTP routers, and the configuration and
//! telemetry plumbing; the `talentgate-api` binary wires them to a listener.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
