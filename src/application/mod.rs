//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Catalog queries and message orchestration
//! - Formatter: Record and notice rendering
//! - Errors: Domain-specific errors
//! - Messaging: Event parsing and command routing

pub mod errors;
pub mod formatter;
pub mod services;
pub mod messaging;
