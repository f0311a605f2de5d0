//! Caller options and the merged configuration shared by one run.
//!
//! [`Options`] is what the host passes in, every field optional. [`Config`]
//! is the result of laying those options over the defaults once per
//! orchestrator run. It is immutable afterwards and handed around as
//! `Rc<Config>`.

use std::fmt;
use std::rc::Rc;

use pagedom::{Document, Selector};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Root list class. Always present on the root so delegation has a stable hook.
pub const DEFAULT_LIST_CLASS: &str = "js-created-list";
pub const DEFAULT_ITEM_CLASS: &str = "js-created-list__item";
pub const DEFAULT_SELECTED_CLASS: &str = "is-selected";

/// Notification hook. The document is passed so the hook can act on the page.
pub type Callback = Rc<dyn Fn(&mut Document)>;

/// Caller-supplied options. Unset fields fall back to the defaults.
///
/// Deserializes from the camelCase options object, e.g.
///
/// ```json
/// { "classes": "fruit-list", "attributesToKeep": ["data-x"], "labelWrapTag": false }
/// ```
///
/// `false` is accepted for `labelWrapTag` and `labelWrapClasses` and means
/// "no wrapping". Callbacks cannot be deserialized; attach them with
/// [`Options::on_after_init`] and [`Options::on_after_select`].
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub classes: Option<String>,
    pub item_classes: Option<String>,
    #[serde(default, deserialize_with = "string_or_false")]
    pub label_wrap_tag: Option<String>,
    #[serde(default, deserialize_with = "string_or_false")]
    pub label_wrap_classes: Option<String>,
    pub attributes_to_keep: Option<Vec<String>>,
    pub select_first_if_none: Option<bool>,
    pub selected_class: Option<String>,
    #[serde(skip)]
    pub on_after_init: Option<Callback>,
    #[serde(skip)]
    pub on_after_select: Option<Callback>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON options object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn classes(mut self, classes: impl Into<String>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    pub fn item_classes(mut self, classes: impl Into<String>) -> Self {
        self.item_classes = Some(classes.into());
        self
    }

    /// A blank tag means no wrapping, as `false` does in JSON.
    pub fn label_wrap_tag(mut self, tag: impl Into<String>) -> Self {
        self.label_wrap_tag = non_blank(tag.into());
        self
    }

    /// Blank classes leave the wrapper without a class attribute.
    pub fn label_wrap_classes(mut self, classes: impl Into<String>) -> Self {
        self.label_wrap_classes = non_blank(classes.into());
        self
    }

    pub fn attributes_to_keep<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.attributes_to_keep = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn select_first_if_none(mut self, enabled: bool) -> Self {
        self.select_first_if_none = Some(enabled);
        self
    }

    pub fn selected_class(mut self, class: impl Into<String>) -> Self {
        self.selected_class = Some(class.into());
        self
    }

    /// Called once per control after its list is attached.
    pub fn on_after_init(mut self, callback: impl Fn(&mut Document) + 'static) -> Self {
        self.on_after_init = Some(Rc::new(callback));
        self
    }

    /// Called once per effective activation, after the list shows the new
    /// selection.
    pub fn on_after_select(mut self, callback: impl Fn(&mut Document) + 'static) -> Self {
        self.on_after_select = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("classes", &self.classes)
            .field("item_classes", &self.item_classes)
            .field("label_wrap_tag", &self.label_wrap_tag)
            .field("label_wrap_classes", &self.label_wrap_classes)
            .field("attributes_to_keep", &self.attributes_to_keep)
            .field("select_first_if_none", &self.select_first_if_none)
            .field("selected_class", &self.selected_class)
            .field("on_after_init", &self.on_after_init.is_some())
            .field("on_after_select", &self.on_after_select.is_some())
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrFalse {
    Flag(bool),
    Text(String),
}

fn string_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde::de::Error;

    match Option::<StringOrFalse>::deserialize(deserializer)? {
        None | Some(StringOrFalse::Flag(false)) => Ok(None),
        Some(StringOrFalse::Flag(true)) => Err(D::Error::custom("expected a string or false")),
        Some(StringOrFalse::Text(text)) => Ok(non_blank(text)),
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Merged configuration of one orchestrator run.
#[derive(Clone)]
pub struct Config {
    pub classes: String,
    pub item_classes: String,
    pub label_wrap_tag: Option<String>,
    pub label_wrap_classes: Option<String>,
    /// Attribute names to copy from options to items, in order, without
    /// duplicates.
    pub attributes_to_keep: Vec<String>,
    pub select_first_if_none: bool,
    pub selected_class: String,
    pub on_after_init: Option<Callback>,
    pub on_after_select: Option<Callback>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classes: DEFAULT_LIST_CLASS.to_string(),
            item_classes: DEFAULT_ITEM_CLASS.to_string(),
            label_wrap_tag: None,
            label_wrap_classes: None,
            attributes_to_keep: Vec::new(),
            select_first_if_none: false,
            selected_class: DEFAULT_SELECTED_CLASS.to_string(),
            on_after_init: None,
            on_after_select: None,
        }
    }
}

impl Config {
    /// Shallow merge of `options` over the defaults. Blank class lists count
    /// as unset, so items always carry a class to delegate on.
    pub fn merge(options: Options) -> Self {
        let defaults = Self::default();

        let mut attributes_to_keep: Vec<String> = Vec::new();
        for name in options.attributes_to_keep.unwrap_or_default() {
            let name = name.trim().to_ascii_lowercase();
            if !name.is_empty() && !attributes_to_keep.contains(&name) {
                attributes_to_keep.push(name);
            }
        }

        Self {
            classes: options.classes.and_then(non_blank).unwrap_or(defaults.classes),
            item_classes: options
                .item_classes
                .and_then(non_blank)
                .unwrap_or(defaults.item_classes),
            label_wrap_tag: options.label_wrap_tag,
            label_wrap_classes: options.label_wrap_classes,
            attributes_to_keep,
            select_first_if_none: options
                .select_first_if_none
                .unwrap_or(defaults.select_first_if_none),
            selected_class: options
                .selected_class
                .and_then(non_blank)
                .unwrap_or(defaults.selected_class),
            on_after_init: options.on_after_init,
            on_after_select: options.on_after_select,
        }
    }

    /// Classes for the list root: the caller's classes, plus the default list
    /// class when the caller replaced it.
    pub fn root_classes(&self) -> String {
        if self.classes == DEFAULT_LIST_CLASS {
            self.classes.clone()
        } else {
            format!("{} {DEFAULT_LIST_CLASS}", self.classes)
        }
    }

    /// Conjunctive selector over every configured item class.
    pub fn item_selector(&self) -> Selector {
        Selector::from_classes(&self.item_classes)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("classes", &self.classes)
            .field("item_classes", &self.item_classes)
            .field("label_wrap_tag", &self.label_wrap_tag)
            .field("label_wrap_classes", &self.label_wrap_classes)
            .field("attributes_to_keep", &self.attributes_to_keep)
            .field("select_first_if_none", &self.select_first_if_none)
            .field("selected_class", &self.selected_class)
            .field("on_after_init", &self.on_after_init.is_some())
            .field("on_after_select", &self.on_after_select.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults() {
        let config = Config::merge(Options::new());
        assert_eq!(config.classes, DEFAULT_LIST_CLASS);
        assert_eq!(config.item_classes, DEFAULT_ITEM_CLASS);
        assert_eq!(config.selected_class, DEFAULT_SELECTED_CLASS);
        assert_eq!(config.label_wrap_tag, None);
        assert!(config.attributes_to_keep.is_empty());
        assert!(!config.select_first_if_none);
    }

    #[test]
    fn test_root_classes_keep_default_hook() {
        let custom = Config::merge(Options::new().classes("fruit-list"));
        assert_eq!(custom.root_classes(), "fruit-list js-created-list");

        let default = Config::merge(Options::new());
        assert_eq!(default.root_classes(), "js-created-list");
    }

    #[test]
    fn test_attributes_to_keep_is_an_ordered_set() {
        let config = Config::merge(Options::new().attributes_to_keep(["data-b", "data-a", "DATA-B", " "]));
        assert_eq!(config.attributes_to_keep, vec!["data-b", "data-a"]);
    }

    #[test]
    fn test_from_json_accepts_false_sentinels() {
        let options = Options::from_json(
            r#"{
                "classes": "fruit-list",
                "itemClasses": "fruit  item",
                "labelWrapTag": false,
                "labelWrapClasses": false,
                "attributesToKeep": ["data-x"],
                "selectFirstIfNone": true,
                "onAfterInit": false
            }"#,
        )
        .unwrap();
        let config = Config::merge(options);

        assert_eq!(config.classes, "fruit-list");
        assert_eq!(config.item_selector().to_string(), ".fruit.item");
        assert_eq!(config.label_wrap_tag, None);
        assert_eq!(config.attributes_to_keep, vec!["data-x"]);
        assert!(config.select_first_if_none);
        assert!(config.on_after_init.is_none());
    }

    #[test]
    fn test_blank_classes_fall_back_to_defaults() {
        let config = Config::merge(Options::new().classes(" ").item_classes("").selected_class("  "));
        assert_eq!(config.root_classes(), DEFAULT_LIST_CLASS);
        assert_eq!(config.item_classes, DEFAULT_ITEM_CLASS);
        assert_eq!(config.item_selector().to_string(), ".js-created-list__item");
        assert_eq!(config.selected_class, DEFAULT_SELECTED_CLASS);
    }

    #[test]
    fn test_blank_label_wrap_is_unset_from_builder_and_json() {
        let built = Options::new().label_wrap_tag(" ").label_wrap_classes("");
        let parsed = Options::from_json(r#"{"labelWrapTag": "", "labelWrapClasses": " "}"#).unwrap();
        for options in [built, parsed] {
            assert_eq!(options.label_wrap_tag, None);
            assert_eq!(options.label_wrap_classes, None);
        }
    }

    #[test]
    fn test_from_json_wrap_tag() {
        let options = Options::from_json(r#"{"labelWrapTag": "span", "labelWrapClasses": "label"}"#).unwrap();
        assert_eq!(options.label_wrap_tag.as_deref(), Some("span"));
        assert_eq!(options.label_wrap_classes.as_deref(), Some("label"));
    }

    #[test]
    fn test_from_json_rejects_true_wrap_tag() {
        assert!(Options::from_json(r#"{"labelWrapTag": true}"#).is_err());
        assert!(Options::from_json("[1, 2]").is_err());
    }
}
