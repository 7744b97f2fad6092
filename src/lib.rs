//! Passgate - terminal client for staged identity verification
//!
//! Walks a user through a credentials step, a 4-digit PIN step, and a
//! 6-digit one-time-code step against a remote verification service. The
//! flow machinery lives in [`flow`]; everything under [`ui`] is
//! presentation.

pub mod api;
pub mod app;
pub mod config;
pub mod flow;
pub mod logging;
pub mod session;
pub mod ui;
