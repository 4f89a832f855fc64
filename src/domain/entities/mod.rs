//! Domain entities - Core business objects with no external dependencies

pub mod record;
pub mod event;
pub mod reply;
pub mod command;

pub use record::CatalogRecord;
pub use event::{Event, Incoming};
pub use reply::{Delivery, Markup, Reply, ReplyAction, MAX_PAYLOAD_BYTES};
pub use command::{CommandKind, CommandSpec, COMMANDS};
