//! Reacting to activation of a mirror item.

use std::cell::RefCell;

use log::debug;
use pagedom::{Document, DomError, NodeId};

use crate::binding::{Binding, BindingKey, BindingRegistry};
use crate::render::VALUE_ATTR;

/// What an activation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The item already carried the selected class. Nothing changed.
    AlreadySelected,
    /// The item's list is not bound to a live control. Nothing changed.
    Unbound,
    /// The control now holds `value` and the item is the selected one.
    Selected { key: BindingKey, value: String },
}

impl Activation {
    pub fn changed(&self) -> bool {
        matches!(self, Activation::Selected { .. })
    }
}

/// Handle activation of `item`.
///
/// The registry is only borrowed while resolving, so change listeners and
/// callbacks may activate other items reentrantly.
pub fn activate(
    doc: &mut Document,
    registry: &RefCell<BindingRegistry>,
    item: NodeId,
) -> Result<Activation, DomError> {
    let binding = registry.borrow().resolve(doc, item);
    match binding {
        Some(binding) => select_item(doc, &binding, item),
        None => {
            debug!("activation of {item} ignored: no live binding");
            Ok(Activation::Unbound)
        }
    }
}

/// Make `item` the selected entry of `binding`'s list.
///
/// Order matters to observers: the control's value is written and its change
/// event fired before the list's classes move, and `on_after_select` runs
/// last.
pub fn select_item(
    doc: &mut Document,
    binding: &Binding,
    item: NodeId,
) -> Result<Activation, DomError> {
    let config = &binding.config;
    if is_selected(doc, item, &config.selected_class) {
        return Ok(Activation::AlreadySelected);
    }

    let value = doc.attr(item, VALUE_ATTR).unwrap_or_default().to_string();
    doc.set_value(binding.control, value.as_str())?;
    doc.trigger_change(binding.control)?;

    mark_selected(doc, binding.list, item, &config.selected_class)?;
    debug!("binding {}: selected {value:?} via {item}", binding.key);

    if let Some(on_after_select) = &config.on_after_select {
        on_after_select(doc);
    }

    Ok(Activation::Selected {
        key: binding.key,
        value,
    })
}

/// Move the selected class to `item`, clearing it from every other item of
/// `list`.
pub fn mark_selected(
    doc: &mut Document,
    list: NodeId,
    item: NodeId,
    selected_class: &str,
) -> Result<(), DomError> {
    for other in doc.element_children(list) {
        doc.remove_class(other, selected_class)?;
    }
    doc.add_class(item, selected_class)
}

fn is_selected(doc: &Document, item: NodeId, selected_class: &str) -> bool {
    let mut classes = selected_class.split_whitespace().peekable();
    classes.peek().is_some() && classes.all(|c| doc.has_class(item, c))
}
