//! Applying the mirror to a set of controls.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, warn};
use pagedom::{Document, DomError, EventKind, NodeId, Selector};

use crate::binding::BindingRegistry;
use crate::config::{Config, Options};
use crate::error::RenderError;
use crate::render::{MirrorList, render};
use crate::selection::{self, Activation};

/// Outcome of one [`SelectToList::apply`] run.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Rendered lists, in control order.
    pub lists: Vec<MirrorList>,
    /// Controls whose render failed. Other controls are not affected.
    pub failures: Vec<(NodeId, RenderError)>,
}

impl InitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Mirror engine of one page.
///
/// Owns the binding registry and remembers which delegated click listeners
/// it installed, so running it repeatedly never stacks listeners for the
/// same item selector.
///
/// ```
/// use pagedom::{Document, Element};
/// use select_mirror::{Options, SelectToList};
///
/// let mut doc = Document::new();
/// let select = doc.create(
///     Element::select()
///         .child(Element::option("a", "Alpha").selected())
///         .child(Element::option("b", "Beta")),
/// );
/// let body = doc.body();
/// doc.append_child(body, select).unwrap();
///
/// let mut mirrors = SelectToList::new();
/// let report = mirrors.apply(&mut doc, &[select], Options::new());
///
/// let beta = report.lists[0].items[1];
/// doc.click(beta).unwrap();
/// assert_eq!(doc.value(select), "b");
/// ```
#[derive(Debug, Default)]
pub struct SelectToList {
    registry: Rc<RefCell<BindingRegistry>>,
    installed: HashSet<String>,
}

impl SelectToList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a mirror list for every control, in order, with one shared
    /// configuration, then make sure item clicks are handled.
    pub fn apply(&mut self, doc: &mut Document, controls: &[NodeId], options: Options) -> InitReport {
        let config = Rc::new(Config::merge(options));
        let mut report = InitReport::default();

        for (index, &control) in controls.iter().enumerate() {
            match render(doc, &self.registry, control, index, &config) {
                Ok(list) => report.lists.push(list),
                Err(err) => {
                    warn!("control {control} skipped: {err}");
                    report.failures.push((control, err));
                }
            }
        }

        self.install_listener(doc, config.item_selector());
        report
    }

    /// [`apply`](Self::apply) to every connected element matching `selector`.
    pub fn apply_selector(
        &mut self,
        doc: &mut Document,
        selector: &str,
        options: Options,
    ) -> Result<InitReport, DomError> {
        let selector = Selector::parse(selector)?;
        let controls = doc.query_selector_all(&selector);
        Ok(self.apply(doc, &controls, options))
    }

    /// Activate an item as a click would.
    pub fn activate(&self, doc: &mut Document, item: NodeId) -> Result<Activation, DomError> {
        selection::activate(doc, &self.registry, item)
    }

    pub fn registry(&self) -> Ref<'_, BindingRegistry> {
        self.registry.borrow()
    }

    fn install_listener(&mut self, doc: &mut Document, selector: Selector) {
        if !self.installed.insert(selector.to_string()) {
            debug!("click listener for {selector} already installed");
            return;
        }
        debug!("installing click listener for {selector}");

        let registry = Rc::clone(&self.registry);
        doc.delegate(EventKind::Click, selector, move |doc, event| {
            if let Err(err) = selection::activate(doc, &registry, event.current_target) {
                warn!("activation of {} failed: {err}", event.current_target);
            }
        });
    }
}
