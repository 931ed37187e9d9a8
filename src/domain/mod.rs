//! Domain layer - pure types with no I/O.
//!
//! This layer contains the core concepts of the message catalog:
//! - Severities and their ordering
//! - Message definitions registered under a code
//! - Format templates and call-site arguments
//! - Summary reports of emission counts
//!
//! All types in this layer are pure and easily testable.

pub mod message;
pub mod severity;
pub mod summary;
pub mod template;
