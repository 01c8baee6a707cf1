//! bomtree: asset hierarchy engine with lossless CSV round-trip.
//!
//! Layers, innermost first: `domain` (pure engine), `application` (session and
//! file services), `infrastructure` (I/O boundary and wiring), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
