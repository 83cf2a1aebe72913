//! One-shot maintenance operations behind the `masjid-admin` binary.
//!
//! Each operation connects, acts, prints a short report and returns. None of
//! them run inside the web server.

pub mod diagnose;
pub mod maintenance;
pub mod seed;

pub use diagnose::*;
pub use maintenance::*;
pub use seed::*;
