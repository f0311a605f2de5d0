//! Builds the mirror list of one control.
//!
//! Rendering has a pure phase ([`build_items`]) turning option entries into
//! mirror items, and a document phase ([`render`]) that materializes them,
//! binds the list to the control and attaches it right after the control.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use pagedom::{Content, Document, DomError, Element, NodeId, escape_attr, escape_text};

use crate::binding::{BindingKey, BindingRegistry, CORRELATION_ATTR};
use crate::config::{Config, DEFAULT_LIST_CLASS};
use crate::error::RenderError;
use crate::option::{OptionEntry, read_options};

/// Attribute carrying an item's value.
pub const VALUE_ATTR: &str = "data-val";

/// Label text, optionally wrapped in an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub wrap_tag: Option<String>,
    pub wrap_classes: Option<String>,
}

impl Label {
    /// Serialized label content as it appears inside the item.
    pub fn markup(&self) -> String {
        let text = escape_text(&self.text);
        match &self.wrap_tag {
            None => text,
            Some(tag) => match &self.wrap_classes {
                Some(classes) => format!("<{tag} class=\"{}\">{text}</{tag}>", escape_attr(classes)),
                None => format!("<{tag}>{text}</{tag}>"),
            },
        }
    }

    fn into_content(self) -> Content {
        match self.wrap_tag {
            None => Content::Text(self.text),
            Some(tag) => {
                let mut wrap = Element::new(tag);
                if let Some(classes) = &self.wrap_classes {
                    wrap = wrap.class(classes);
                }
                Content::Element(wrap.text(self.text))
            }
        }
    }
}

/// One entry of a mirror list before it is attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorItem {
    pub value: String,
    pub classes: Vec<String>,
    /// Kept attributes, in allow-list order.
    pub attributes: Vec<(String, String)>,
    pub label: Label,
}

impl MirrorItem {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn mark_selected(&mut self, selected_class: &str) {
        for class in selected_class.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
    }

    fn into_element(self) -> Element {
        let mut li = Element::new("li")
            .class(&self.classes.join(" "))
            .attr(VALUE_ATTR, self.value);
        for (name, value) in self.attributes {
            li = li.attr(name, value);
        }
        li.child(self.label.into_content())
    }
}

/// Handle to a rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorList {
    pub key: BindingKey,
    /// Position of the control within its orchestrator run.
    pub index: usize,
    pub control: NodeId,
    pub root: NodeId,
    pub items: Vec<NodeId>,
}

/// One mirror item per option entry, in order.
pub fn build_items(entries: &[OptionEntry], config: &Config) -> Vec<MirrorItem> {
    let mut items: Vec<MirrorItem> = entries
        .iter()
        .map(|entry| {
            let mut item = MirrorItem {
                value: entry.value.clone(),
                classes: config.item_classes.split_whitespace().map(str::to_string).collect(),
                // The item's own class, value and key attributes take precedence.
                attributes: config
                    .attributes_to_keep
                    .iter()
                    .filter(|name| !matches!(name.as_str(), "class" | VALUE_ATTR | CORRELATION_ATTR))
                    .filter_map(|name| entry.attr(name).map(|v| (name.clone(), v.to_string())))
                    .collect(),
                label: Label {
                    text: entry.label.clone(),
                    wrap_tag: config.label_wrap_tag.clone(),
                    wrap_classes: config.label_wrap_classes.clone(),
                },
            };
            if entry.is_selected {
                item.mark_selected(&config.selected_class);
            }
            item
        })
        .collect();

    // Visual default only, the control is left alone. Marks the first item
    // even next to a real selection; the next activation clears both.
    if config.select_first_if_none
        && let Some(first) = items.first_mut()
    {
        first.mark_selected(&config.selected_class);
    }

    items
}

/// Render the mirror list of `control` and attach it after the control.
///
/// `index` is the control's position in the current run. The binding key comes
/// from the document's counter. `registry` is not borrowed any more when
/// `on_after_init` runs.
pub fn render(
    doc: &mut Document,
    registry: &RefCell<BindingRegistry>,
    control: NodeId,
    index: usize,
    config: &Rc<Config>,
) -> Result<MirrorList, RenderError> {
    let tag = doc.require_element(control)?;
    if tag != "select" {
        return Err(RenderError::NotASelect {
            control,
            tag: tag.to_string(),
        });
    }

    if doc.parent(control).is_none() {
        return Err(DomError::Detached(control).into());
    }

    let entries = read_options(doc, control)?;
    let items = build_items(&entries, config);
    let key = BindingKey::allocate(doc);

    let root = doc.create(
        Element::new("ul")
            .class(&config.root_classes())
            .id(format!("{DEFAULT_LIST_CLASS}-{key}"))
            .children(items.into_iter().map(MirrorItem::into_element)),
    );
    registry
        .borrow_mut()
        .bind(doc, control, root, key, Rc::clone(config))?;
    doc.insert_after(control, root)?;

    let items = doc.element_children(root);
    debug!(
        "rendered list {root} for control {control}: key {key}, index {index}, {} items",
        items.len()
    );

    if let Some(on_after_init) = &config.on_after_init {
        on_after_init(doc);
    }

    Ok(MirrorList {
        key,
        index,
        control,
        root,
        items,
    })
}
