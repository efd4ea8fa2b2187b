/// Configuration, records, and naming rules for prodthumb.
///
/// This crate contains the shared types used across the prodthumb workspace:
/// the resolved run configuration, the product row record, and the pure
/// functions that turn a row into a display name and a thumbnail filename.

pub mod config;
pub mod error;
pub mod naming;
pub mod record;

pub use config::ThumbConfig;
pub use error::CoreError;
pub use naming::{resolve_display_name, thumbnail_filename};
pub use record::{Column, KnownColumn, ProductRecord};
