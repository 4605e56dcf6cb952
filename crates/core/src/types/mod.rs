//! Core types for the GOGN membership panel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod member_code;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use member_code::{MemberCode, MemberCodeError};
pub use status::*;
