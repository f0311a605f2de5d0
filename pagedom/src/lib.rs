pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod selector;
mod serialize;

pub use document::{Document, NodeId};
pub use element::{Content, Element};
pub use error::DomError;
pub use event::{Event, EventKind, Handler};
pub use selector::Selector;
pub use serialize::{escape_attr, escape_text};
