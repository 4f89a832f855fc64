//! Conversational storefront for a catalog of domains offered for sale.
//!
//! Chat events are parsed into [`domain::entities::Event`]s, routed by
//! [`application::messaging::CommandRouter`] against a
//! [`domain::traits::CatalogStore`], and delivered through a
//! [`domain::traits::Bot`] transport.

pub mod domain;
pub mod application;
pub mod infrastructure;
