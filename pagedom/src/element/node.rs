use super::Content;

/// Detached element description, materialized with [`Document::create`].
///
/// Attributes keep insertion order, which is also their serialization order.
/// The `class` attribute is an ordinary attribute; [`Element::class`] appends
/// to it.
///
/// [`Document::create`]: crate::Document::create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Content>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn select() -> Self {
        Self::new("select")
    }

    /// An `<option>` with a `value` attribute and a text label.
    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new("option").attr("value", value).text(label)
    }

    // Identity
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    // Attributes

    /// Set an attribute, replacing an existing one of the same name in place.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Append one or more whitespace separated classes, skipping duplicates.
    pub fn class(mut self, classes: &str) -> Self {
        let mut current: Vec<String> = self
            .get_attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        for class in classes.split_whitespace() {
            if !current.iter().any(|c| c == class) {
                current.push(class.to_string());
            }
        }
        if current.is_empty() {
            return self;
        }
        let joined = current.join(" ");
        self.attr("class", joined)
    }

    /// Mark an `<option>` as selected through its attribute.
    pub fn selected(self) -> Self {
        self.attr("selected", "selected")
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    // Children
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Content>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<C: Into<Content>>(mut self, new_children: impl IntoIterator<Item = C>) -> Self {
        self.children.extend(new_children.into_iter().map(Into::into));
        self
    }
}
