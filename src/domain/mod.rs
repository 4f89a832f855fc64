//! Domain layer - Core business objects with no external dependencies
//!
//! This layer contains:
//! - Entities: Catalog records, inbound events, outbound replies, the command table
//! - Traits: Abstractions for infrastructure (Bot transport, CatalogStore)

pub mod entities;
pub mod traits;
