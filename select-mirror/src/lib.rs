//! Clickable lists mirroring `<select>` controls.
//!
//! Every control gets a sibling `<ul>` with one `<li>` per option. Clicking an
//! item writes its value back to the control and fires the control's change
//! event, so the control stays the single source of truth and existing
//! change listeners keep working. Control and list share a binding key, which
//! lets any number of pairs live on one page.

pub mod binding;
pub mod config;
pub mod error;
pub mod option;
pub mod orchestrator;
pub mod render;
pub mod selection;

pub use binding::{Binding, BindingKey, BindingRegistry, CORRELATION_ATTR};
pub use config::{Callback, Config, Options};
pub use error::{ConfigError, RenderError};
pub use option::{OptionEntry, read_options};
pub use orchestrator::{InitReport, SelectToList};
pub use render::{Label, MirrorItem, MirrorList, VALUE_ATTR, build_items, render};
pub use selection::{Activation, activate};
