//! Mirrors two selects, clicks through them and prints the page.
//!
//! Logs go to `select-mirror-demo.log`.

use std::fs::File;

use pagedom::{Document, Element, EventKind};
use select_mirror::{Options, SelectToList};
use simplelog::{Config, LevelFilter, WriteLogger};

fn main() {
    let log_file = File::create("select-mirror-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut doc = Document::new();
    let body = doc.body();

    let size = doc.create(
        Element::select()
            .class("js-to-list")
            .attr("name", "size")
            .child(Element::option("s", "Small"))
            .child(Element::option("m", "Medium").selected())
            .child(Element::option("l", "Large").attr("data-stock", "low")),
    );
    let color = doc.create(
        Element::select()
            .class("js-to-list")
            .attr("name", "color")
            .child(Element::option("red", "Red").attr("data-hex", "#f00"))
            .child(Element::option("blue", "Blue").attr("data-hex", "#00f")),
    );
    doc.append_child(body, size).expect("attach size");
    doc.append_child(body, color).expect("attach color");

    for control in [size, color] {
        doc.on(control, EventKind::Change, |doc, event| {
            let name = doc.attr(event.target, "name").unwrap_or("?").to_string();
            println!("change: {name} = {}", doc.value(event.target));
        })
        .expect("listen for changes");
    }

    let options = Options::from_json(
        r#"{
            "classes": "choice-list",
            "labelWrapTag": "span",
            "labelWrapClasses": "choice-list__label",
            "attributesToKeep": ["data-stock", "data-hex"],
            "selectFirstIfNone": true
        }"#,
    )
    .expect("valid options")
    .on_after_init(|_| println!("list ready"))
    .on_after_select(|_| println!("selection settled"));

    let mut mirrors = SelectToList::new();
    let report = mirrors
        .apply_selector(&mut doc, "select.js-to-list", options)
        .expect("valid selector");

    let large = report.lists[0].items[2];
    let blue = report.lists[1].items[1];
    doc.click(large).expect("click large");
    doc.click(large).expect("click large again");
    doc.click(blue).expect("click blue");

    println!();
    println!("{}", doc.inner_html(body));
}
