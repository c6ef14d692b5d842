//! # billtag-core
//!
//! Core types, traits, and the tag definition DAO for billtag.
//!
//! Storage backends implement [`TagDefinitionSqlStore`]; the PostgreSQL one
//! lives in `billtag-db`.

pub mod call_context;
pub mod dao;
pub mod error;
pub mod events;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use call_context::{CallContext, CallOrigin, UserType};
pub use dao::TagDefinitionDao;
pub use error::{Error, ErrorCode, Result};
pub use events::{EventBus, EventEnvelope, TagDefinitionEvent};
pub use tags::*;
pub use traits::*;
