//! Shared types for the Freightexpo platform
//!
//! Common types used by the server and by any future console/client crates:
//! the unified error system, commerce enums, and small utility helpers.

pub mod commerce;
pub mod error;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
