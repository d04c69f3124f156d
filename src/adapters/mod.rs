//! Port implementations.
//!
//! `live` talks to the real world; `memory` keeps everything in process.

pub mod live;
pub mod memory;
