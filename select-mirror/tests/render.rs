use std::cell::RefCell;
use std::rc::Rc;

use pagedom::{Document, Element, NodeId};
use select_mirror::{CORRELATION_ATTR, Options, RenderError, SelectToList, VALUE_ATTR};

fn mount(doc: &mut Document, select: Element) -> NodeId {
    let control = doc.create(select);
    let body = doc.body();
    doc.append_child(body, control).unwrap();
    control
}

fn alpha_beta() -> Element {
    Element::select()
        .child(Element::option("a", "Alpha").selected())
        .child(Element::option("b", "Beta").attr("data-x", "5"))
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_one_item_per_option_in_order() {
    let mut doc = Document::new();
    let control = mount(
        &mut doc,
        Element::select()
            .child(Element::option("1", "One"))
            .child(Element::option("2", "Two"))
            .child(Element::option("3", "Three"))
            .child(Element::option("4", "Four")),
    );

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new());
    let list = &report.lists[0];

    let values: Vec<_> = list
        .items
        .iter()
        .map(|&item| doc.attr(item, VALUE_ATTR).unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["1", "2", "3", "4"]);
    let labels: Vec<_> = list.items.iter().map(|&item| doc.text_content(item)).collect();
    assert_eq!(labels, vec!["One", "Two", "Three", "Four"]);
}

#[test]
fn test_list_is_attached_right_after_control() {
    let mut doc = Document::new();
    let before = mount(&mut doc, Element::new("p"));
    let control = mount(&mut doc, alpha_beta());
    let after = mount(&mut doc, Element::new("p"));

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new());
    let root = report.lists[0].root;

    assert_eq!(doc.children(doc.body()), &[before, control, root, after]);
    assert_eq!(doc.tag(root), Some("ul"));
}

#[test]
fn test_default_markup() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new());

    assert_eq!(
        doc.outer_html(report.lists[0].root),
        concat!(
            r#"<ul class="js-created-list" id="js-created-list-0" data-rel="0">"#,
            r#"<li class="js-created-list__item is-selected" data-val="a">Alpha</li>"#,
            r#"<li class="js-created-list__item" data-val="b">Beta</li>"#,
            "</ul>"
        )
    );
}

#[test]
fn test_empty_control_renders_empty_list() {
    let mut doc = Document::new();
    let control = mount(&mut doc, Element::select());

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new());

    assert!(report.is_complete());
    assert!(report.lists[0].items.is_empty());
    assert!(doc.is_connected(report.lists[0].root));
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn test_custom_root_class_keeps_default_hook() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new().classes("fruit-list"));

    assert_eq!(doc.classes(report.lists[0].root), vec!["fruit-list", "js-created-list"]);
}

#[test]
fn test_default_root_class_is_not_duplicated() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(
        &mut doc,
        &[control],
        Options::new().classes("js-created-list"),
    );

    assert_eq!(doc.classes(report.lists[0].root), vec!["js-created-list"]);
}

#[test]
fn test_custom_item_and_selected_classes() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(
        &mut doc,
        &[control],
        Options::new().item_classes("fruit fruit--big").selected_class("on"),
    );
    let items = &report.lists[0].items;

    assert_eq!(doc.classes(items[0]), vec!["fruit", "fruit--big", "on"]);
    assert_eq!(doc.classes(items[1]), vec!["fruit", "fruit--big"]);
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_kept_attribute_only_where_present() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(
        &mut doc,
        &[control],
        Options::new().attributes_to_keep(["data-x"]),
    );
    let items = &report.lists[0].items;

    assert_eq!(doc.attr(items[1], "data-x"), Some("5"));
    assert!(!doc.has_attr(items[0], "data-x"));
}

#[test]
fn test_unlisted_attributes_never_copied() {
    let mut doc = Document::new();
    let control = mount(
        &mut doc,
        Element::select().child(
            Element::option("a", "Alpha")
                .attr("data-x", "1")
                .attr("data-secret", "2")
                .attr("title", "t"),
        ),
    );

    let report = SelectToList::new().apply(
        &mut doc,
        &[control],
        Options::new().attributes_to_keep(["title"]),
    );
    let item = report.lists[0].items[0];

    let names: Vec<_> = doc.attributes(item).iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["class", VALUE_ATTR, "title"]);
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn test_label_wrap_with_classes() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(
        &mut doc,
        &[control],
        Options::new().label_wrap_tag("span").label_wrap_classes("label label--muted"),
    );

    assert_eq!(
        doc.inner_html(report.lists[0].items[1]),
        r#"<span class="label label--muted">Beta</span>"#
    );
}

#[test]
fn test_label_wrap_without_classes() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new().label_wrap_tag("em"));

    assert_eq!(doc.inner_html(report.lists[0].items[0]), "<em>Alpha</em>");
}

// ============================================================================
// Initial selection
// ============================================================================

#[test]
fn test_select_first_if_none_is_visual_only() {
    let mut doc = Document::new();
    let control = mount(
        &mut doc,
        Element::select()
            .child(Element::option("a", "Alpha"))
            .child(Element::option("b", "Beta")),
    );
    doc.set_value(control, "b").unwrap();

    let report = SelectToList::new().apply(
        &mut doc,
        &[control],
        Options::new().select_first_if_none(true),
    );
    let items = &report.lists[0].items;

    assert!(doc.has_class(items[0], "is-selected"));
    assert!(!doc.has_class(items[1], "is-selected"));
    assert_eq!(doc.value(control), "b");
}

#[test]
fn test_no_selection_without_policy() {
    let mut doc = Document::new();
    let control = mount(
        &mut doc,
        Element::select()
            .child(Element::option("a", "Alpha"))
            .child(Element::option("b", "Beta")),
    );

    let report = SelectToList::new().apply(&mut doc, &[control], Options::new());

    assert!(report.lists[0].items.iter().all(|&i| !doc.has_class(i, "is-selected")));
}

// ============================================================================
// Binding and callbacks
// ============================================================================

#[test]
fn test_control_and_list_share_key() {
    let mut doc = Document::new();
    let control = mount(&mut doc, alpha_beta());

    let mut mirrors = SelectToList::new();
    let report = mirrors.apply(&mut doc, &[control], Options::new());
    let list = &report.lists[0];

    assert_eq!(doc.attr(control, CORRELATION_ATTR), Some("0"));
    assert_eq!(doc.attr(list.root, CORRELATION_ATTR), Some("0"));
    assert_eq!(mirrors.registry().control_for(list.key), Some(control));
}

#[test]
fn test_on_after_init_runs_once_per_control_after_attachment() {
    let mut doc = Document::new();
    let first = mount(&mut doc, alpha_beta());
    let second = mount(&mut doc, alpha_beta());
    let lists_seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&lists_seen);
    let options = Options::new().on_after_init(move |doc| {
        let body = doc.body();
        let lists = doc.element_children(body).into_iter().filter(|&n| doc.tag(n) == Some("ul")).count();
        sink.borrow_mut().push(lists);
    });
    SelectToList::new().apply(&mut doc, &[first, second], options);

    assert_eq!(*lists_seen.borrow(), vec![1, 2]);
}

#[test]
fn test_failed_control_does_not_stop_the_run() {
    let mut doc = Document::new();
    let first = mount(&mut doc, alpha_beta());
    let not_a_select = mount(&mut doc, Element::new("input"));
    let detached = doc.create(alpha_beta());
    let last = mount(&mut doc, alpha_beta());

    let report = SelectToList::new().apply(
        &mut doc,
        &[first, not_a_select, detached, last],
        Options::new(),
    );

    assert_eq!(report.lists.len(), 2);
    assert_eq!(report.lists[0].control, first);
    assert_eq!(report.lists[1].control, last);
    assert_eq!(report.lists[1].index, 3);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(
        report.failures[0],
        (node, RenderError::NotASelect { .. }) if node == not_a_select
    ));
    assert_eq!(report.failures[1].0, detached);
}
