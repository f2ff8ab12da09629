//! In-memory [`WebDriver`] for unit testing page objects.
//!
//! Elements are registered against the exact [`By`] selectors that should find
//! them, optionally nested under a parent element or inside a shadow root.
//! Timing helpers (`available_after`, `displayed_after`) and handle
//! invalidation make it possible to exercise waits and stale re-resolution
//! without a browser.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use uuid::Uuid;

use crate::driver::{DriverError, DriverResult, ElementHandle, Rect, SearchScope, WebDriver};
use crate::locator::By;

/// Stable identity of a mock element across handle invalidations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Mock element description
#[derive(Debug, Clone)]
pub struct MockElement {
    selectors: Vec<By>,
    tag: String,
    text: String,
    attributes: HashMap<String, String>,
    properties: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    selected: bool,
    rect: Rect,
    available_after: Option<Duration>,
    displayed_after: Option<Duration>,
    shadow_host: bool,
}

impl MockElement {
    /// Element found by `by`
    #[must_use]
    pub fn new(by: By) -> Self {
        Self {
            selectors: vec![by],
            tag: "div".to_string(),
            text: String::new(),
            attributes: HashMap::new(),
            properties: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: false,
            rect: Rect::new(0, 0, 100, 20),
            available_after: None,
            displayed_after: None,
            shadow_host: false,
        }
    }

    /// Also found by `by`
    #[must_use]
    pub fn matching(mut self, by: By) -> Self {
        self.selectors.push(by);
        self
    }

    /// Tag name
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Rendered text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// DOM attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// DOM property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Not enabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Selected
    #[must_use]
    pub const fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Bounding rectangle
    #[must_use]
    pub const fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Not findable until `delay` after registration
    #[must_use]
    pub const fn available_after(mut self, delay: Duration) -> Self {
        self.available_after = Some(delay);
        self
    }

    /// Hidden until `delay` after registration
    #[must_use]
    pub const fn displayed_after(mut self, delay: Duration) -> Self {
        self.displayed_after = Some(delay);
        self
    }

    /// Hosts a shadow root
    #[must_use]
    pub const fn shadow_host(mut self) -> Self {
        self.shadow_host = true;
        self
    }
}

#[derive(Debug)]
struct Node {
    handle: String,
    shadow_handle: String,
    parent: Option<usize>,
    in_parent_shadow: bool,
    element: MockElement,
    registered: Instant,
    removed: bool,
}

impl Node {
    fn present(&self, now: Instant) -> bool {
        !self.removed
            && self
                .element
                .available_after
                .map_or(true, |d| now >= self.registered + d)
    }

    fn displayed(&self, now: Instant) -> bool {
        self.element.displayed
            && self
                .element
                .displayed_after
                .map_or(true, |d| now >= self.registered + d)
    }
}

#[derive(Debug, Default)]
struct MockState {
    nodes: Vec<Node>,
    scripts: HashMap<String, Value>,
    current_url: String,
    call_history: Vec<String>,
}

impl MockState {
    fn node_for(&self, handle: &ElementHandle) -> DriverResult<usize> {
        self.nodes
            .iter()
            .position(|n| n.handle == handle.id && !n.removed)
            .ok_or_else(|| DriverError::StaleElementReference {
                element: handle.id.clone(),
            })
    }

    fn shadow_host_for(&self, handle: &ElementHandle) -> DriverResult<usize> {
        self.nodes
            .iter()
            .position(|n| n.element.shadow_host && n.shadow_handle == handle.id && !n.removed)
            .ok_or_else(|| DriverError::StaleElementReference {
                element: handle.id.clone(),
            })
    }

    /// Whether `node` is reachable from `root` crossing exactly the shadow
    /// boundary requested (none for light-DOM search, the root's own for
    /// shadow search)
    fn in_scope(&self, node: usize, root: Option<usize>, through_shadow: bool) -> bool {
        let mut current = node;
        loop {
            let n = &self.nodes[current];
            match n.parent {
                None => return root.is_none(),
                Some(parent) => {
                    if Some(parent) == root {
                        return n.in_parent_shadow == through_shadow;
                    }
                    if n.in_parent_shadow {
                        return false;
                    }
                    current = parent;
                }
            }
        }
    }

    fn record(&mut self, call: String) {
        self.call_history.push(call);
    }
}

/// In-memory driver session
#[derive(Debug, Default)]
pub struct MockDriver {
    state: RefCell<MockState>,
}

impl MockDriver {
    /// Empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, parent: Option<NodeId>, in_shadow: bool, element: MockElement) -> NodeId {
        let mut state = self.state.borrow_mut();
        state.nodes.push(Node {
            handle: Uuid::new_v4().to_string(),
            shadow_handle: Uuid::new_v4().to_string(),
            parent: parent.map(|p| p.0),
            in_parent_shadow: in_shadow,
            element,
            registered: Instant::now(),
            removed: false,
        });
        NodeId(state.nodes.len() - 1)
    }

    /// Register a top-level element
    pub fn add(&self, element: MockElement) -> NodeId {
        self.insert(None, false, element)
    }

    /// Register an element under `parent`
    pub fn add_child(&self, parent: NodeId, element: MockElement) -> NodeId {
        self.insert(Some(parent), false, element)
    }

    /// Register an element inside `host`'s shadow root
    pub fn add_shadow_child(&self, host: NodeId, element: MockElement) -> NodeId {
        self.state.borrow_mut().nodes[host.0].element.shadow_host = true;
        self.insert(Some(host), true, element)
    }

    /// Current handle of a node
    #[must_use]
    pub fn handle(&self, node: NodeId) -> ElementHandle {
        ElementHandle::new(self.state.borrow().nodes[node.0].handle.clone())
    }

    /// Re-render a node: old handles go stale, lookups return a new handle
    pub fn invalidate(&self, node: NodeId) -> ElementHandle {
        let id = Uuid::new_v4().to_string();
        self.state.borrow_mut().nodes[node.0].handle.clone_from(&id);
        ElementHandle::new(id)
    }

    /// Detach a node from the page
    pub fn remove(&self, node: NodeId) {
        self.state.borrow_mut().nodes[node.0].removed = true;
    }

    /// Re-attach a removed node under a fresh handle
    pub fn restore(&self, node: NodeId) -> ElementHandle {
        self.state.borrow_mut().nodes[node.0].removed = false;
        self.invalidate(node)
    }

    /// Set a DOM attribute
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .element
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Remove a DOM attribute
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.state.borrow_mut().nodes[node.0]
            .element
            .attributes
            .remove(name);
    }

    /// Set a DOM property
    pub fn set_property(&self, node: NodeId, name: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .element
            .properties
            .insert(name.to_string(), value.to_string());
    }

    /// Set rendered text
    pub fn set_text(&self, node: NodeId, text: &str) {
        self.state.borrow_mut().nodes[node.0].element.text = text.to_string();
    }

    /// Show or hide
    pub fn set_displayed(&self, node: NodeId, displayed: bool) {
        let mut state = self.state.borrow_mut();
        let element = &mut state.nodes[node.0].element;
        element.displayed = displayed;
        element.displayed_after = None;
    }

    /// Enable or disable
    pub fn set_enabled(&self, node: NodeId, enabled: bool) {
        self.state.borrow_mut().nodes[node.0].element.enabled = enabled;
    }

    /// Select or deselect
    pub fn set_selected(&self, node: NodeId, selected: bool) {
        self.state.borrow_mut().nodes[node.0].element.selected = selected;
    }

    /// Value returned by `execute_script` for exactly `script`
    pub fn set_script_result(&self, script: impl Into<String>, result: Value) {
        self.state
            .borrow_mut()
            .scripts
            .insert(script.into(), result);
    }

    /// Call history for verification
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state
            .borrow()
            .call_history
            .iter()
            .any(|c| c.starts_with(method))
    }

    /// Number of recorded calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    /// Number of lookups performed
    #[must_use]
    pub fn find_count(&self) -> usize {
        self.call_count("find_elements:")
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        self.state.borrow_mut().call_history.clear();
    }

    fn with_node<T>(
        &self,
        call: &str,
        element: &ElementHandle,
        f: impl FnOnce(&mut Node, Instant) -> DriverResult<T>,
    ) -> DriverResult<T> {
        let mut state = self.state.borrow_mut();
        state.record(format!("{call}:{}", element.id));
        let index = state.node_for(element)?;
        f(&mut state.nodes[index], Instant::now())
    }
}

impl WebDriver for MockDriver {
    fn find_elements(&self, scope: &SearchScope, by: &By) -> DriverResult<Vec<ElementHandle>> {
        let mut state = self.state.borrow_mut();
        state.record(format!("find_elements:{by}"));
        let (root, through_shadow) = match scope {
            SearchScope::Document => (None, false),
            SearchScope::Element(handle) => (Some(state.node_for(handle)?), false),
            SearchScope::ShadowRoot(handle) => (Some(state.shadow_host_for(handle)?), true),
        };
        let now = Instant::now();
        let state = &*state;
        Ok(state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.present(now) && n.element.selectors.contains(by))
            .filter(|(i, _)| state.in_scope(*i, root, through_shadow))
            .map(|(_, n)| ElementHandle::new(n.handle.clone()))
            .collect())
    }

    fn shadow_root(&self, element: &ElementHandle) -> DriverResult<ElementHandle> {
        self.with_node("shadow_root", element, |node, _| {
            if node.element.shadow_host {
                Ok(ElementHandle::new(node.shadow_handle.clone()))
            } else {
                Err(DriverError::Other {
                    message: format!("no shadow root attached to {}", node.handle),
                })
            }
        })
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        self.with_node("attribute", element, |node, _| {
            Ok(node
                .element
                .attributes
                .get(name)
                .or_else(|| node.element.properties.get(name))
                .cloned())
        })
    }

    fn dom_attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        self.with_node("dom_attribute", element, |node, _| {
            Ok(node.element.attributes.get(name).cloned())
        })
    }

    fn dom_property(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        self.with_node("dom_property", element, |node, _| {
            Ok(node.element.properties.get(name).cloned())
        })
    }

    fn text(&self, element: &ElementHandle) -> DriverResult<String> {
        self.with_node("text", element, |node, _| Ok(node.element.text.clone()))
    }

    fn tag_name(&self, element: &ElementHandle) -> DriverResult<String> {
        self.with_node("tag_name", element, |node, _| Ok(node.element.tag.clone()))
    }

    fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.with_node("is_displayed", element, |node, now| Ok(node.displayed(now)))
    }

    fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.with_node("is_enabled", element, |node, _| Ok(node.element.enabled))
    }

    fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.with_node("is_selected", element, |node, _| Ok(node.element.selected))
    }

    fn rect(&self, element: &ElementHandle) -> DriverResult<Rect> {
        self.with_node("rect", element, |node, _| Ok(node.element.rect))
    }

    fn css_value(&self, element: &ElementHandle, property: &str) -> DriverResult<String> {
        self.with_node("css_value", element, |node, now| {
            Ok(match property {
                "display" if !node.displayed(now) => "none".to_string(),
                "display" => "block".to_string(),
                _ => String::new(),
            })
        })
    }

    fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        self.with_node("click", element, |node, now| {
            if !node.displayed(now) {
                return Err(DriverError::ElementNotInteractable {
                    element: node.handle.clone(),
                });
            }
            let tag = node.element.tag.as_str();
            let kind = node.element.attributes.get("type").map(String::as_str);
            match (tag, kind) {
                ("input", Some("checkbox")) => node.element.selected = !node.element.selected,
                ("input", Some("radio")) => node.element.selected = true,
                _ => {}
            }
            Ok(())
        })
    }

    fn submit(&self, element: &ElementHandle) -> DriverResult<()> {
        self.with_node("submit", element, |_, _| Ok(()))
    }

    fn send_keys(&self, element: &ElementHandle, keys: &str) -> DriverResult<()> {
        self.with_node("send_keys", element, |node, now| {
            if !node.displayed(now) || !node.element.enabled {
                return Err(DriverError::ElementNotInteractable {
                    element: node.handle.clone(),
                });
            }
            node.element
                .properties
                .entry("value".to_string())
                .or_default()
                .push_str(keys);
            Ok(())
        })
    }

    fn clear(&self, element: &ElementHandle) -> DriverResult<()> {
        self.with_node("clear", element, |node, _| {
            node.element.properties.insert("value".to_string(), String::new());
            Ok(())
        })
    }

    fn execute_script(&self, script: &str, _args: &[Value]) -> DriverResult<Value> {
        let mut state = self.state.borrow_mut();
        state.record(format!("execute_script:{script}"));
        Ok(state.scripts.get(script).cloned().unwrap_or(Value::Null))
    }

    fn navigate(&self, url: &str) -> DriverResult<()> {
        let mut state = self.state.borrow_mut();
        state.record(format!("navigate:{url}"));
        state.current_url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> DriverResult<String> {
        Ok(self.state.borrow().current_url.clone())
    }
}
