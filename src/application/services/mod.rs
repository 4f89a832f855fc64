//! Application services - Business logic orchestration

pub mod catalog_service;
pub mod message_service;

pub use catalog_service::CatalogService;
pub use message_service::MessageService;
