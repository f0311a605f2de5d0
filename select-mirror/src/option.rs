//! Read-only snapshot of a control's options.

use pagedom::{Document, DomError, NodeId};

/// One `<option>` as seen at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
    /// Presence of the `selected` attribute in markup.
    pub is_selected: bool,
    /// Every attribute present on the option, in source order.
    pub attributes: Vec<(String, String)>,
}

impl OptionEntry {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Options of `control` in document order, including those nested in
/// `<optgroup>`. A control without options yields an empty list.
pub fn read_options(doc: &Document, control: NodeId) -> Result<Vec<OptionEntry>, DomError> {
    doc.require_element(control)?;

    Ok(doc
        .descendants(control)
        .into_iter()
        .filter(|&node| doc.tag(node) == Some("option"))
        .map(|option| OptionEntry {
            value: doc.value(option),
            label: doc.text_content(option),
            is_selected: doc.has_attr(option, "selected"),
            attributes: doc.attributes(option).to_vec(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use pagedom::Element;

    use super::*;

    #[test]
    fn test_reads_nested_options_in_order() {
        let mut doc = Document::new();
        let select = doc.create(
            Element::select()
                .child(Element::option("a", "Alpha").selected())
                .child(
                    Element::new("optgroup")
                        .attr("label", "More")
                        .child(Element::option("b", "Beta").attr("data-x", "5")),
                ),
        );

        let entries = read_options(&doc, select).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "a");
        assert_eq!(entries[0].label, "Alpha");
        assert!(entries[0].is_selected);
        assert_eq!(entries[1].value, "b");
        assert!(!entries[1].is_selected);
        assert_eq!(entries[1].attr("data-x"), Some("5"));
        assert_eq!(entries[0].attr("data-x"), None);
    }

    #[test]
    fn test_empty_control() {
        let mut doc = Document::new();
        let select = doc.create(Element::select());
        assert!(read_options(&doc, select).unwrap().is_empty());
    }

    #[test]
    fn test_text_node_is_rejected() {
        let mut doc = Document::new();
        let text = doc.create_text("not a control");
        assert_eq!(read_options(&doc, text), Err(DomError::NotAnElement(text)));
    }
}
