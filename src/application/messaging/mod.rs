//! Message handling - Event parsing and routing

pub mod parser;
pub mod router;

pub use parser::MessageParser;
pub use router::{CommandRouter, RouterSettings};
