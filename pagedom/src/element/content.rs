/// A child of an [`Element`](super::Element) builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(super::Element),
    Text(String),
}

impl From<super::Element> for Content {
    fn from(element: super::Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
