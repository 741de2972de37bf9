// --- File: crates/terminwahl_form/src/registry.rs ---
//! Element registry: the explicit view model of the booking page.
//!
//! Every element the page scripts touch is registered here under its id.
//! Lookups return `Option`, so a missing element is a value the caller
//! handles instead of an exception to swallow.

use std::collections::{BTreeSet, HashMap};

use crate::error::FormError;

/// CSS `display` state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// No inline display set, the stylesheet decides.
    #[default]
    Unset,
    Block,
    Inline,
    None,
}

/// Inline style of an element. Only the properties the page scripts write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub display: Display,
    /// `display` was set with `!important`
    pub important: bool,
    pub border: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub opacity: Option<String>,
    pub css_text: Option<String>,
}

/// What happens when an element is activated (click, or Enter on key-up).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enable a (button) element.
    Enable(String),
    /// Write a form value.
    SetValue { id: String, value: String },
    /// Mark `id` as selected, resetting every element with `name` and `class`.
    SetBorder {
        id: String,
        name: String,
        class: String,
    },
}

/// A single page element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub tag: String,
    pub name: Option<String>,
    pub classes: BTreeSet<String>,
    pub value: String,
    pub inner_html: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub checked: bool,
    pub disabled: bool,
    pub tab_index: Option<i32>,
    pub style: Style,
    pub on_activate: Vec<Command>,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

impl Element {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.style.display = display;
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.on_activate = commands;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Form controls and elements with a tab index can take focus.
    pub fn is_focusable(&self) -> bool {
        self.tab_index.is_some_and(|i| i >= 0)
            || matches!(
                self.tag.as_str(),
                "input" | "select" | "textarea" | "button" | "a"
            )
    }

    pub fn is_hidden(&self) -> bool {
        self.style.display == Display::None
    }

    pub fn set_display(&mut self, display: Display, important: bool) {
        self.style.display = display;
        self.style.important = important;
    }
}

/// Owns all elements of a page, indexed by id, in document order.
#[derive(Debug, Default, Clone)]
pub struct ElementRegistry {
    elements: HashMap<String, Element>,
    order: Vec<String>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Like `get_mut`, but a missing element is an error.
    pub fn require_mut(&mut self, id: &str) -> Result<&mut Element, FormError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| FormError::ElementNotFound(id.to_string()))
    }

    pub fn require(&self, id: &str) -> Result<&Element, FormError> {
        self.elements
            .get(id)
            .ok_or_else(|| FormError::ElementNotFound(id.to_string()))
    }

    /// Registers a top-level element, replacing (with its subtree) any element with the same id.
    pub fn insert(&mut self, element: Element) {
        if self.elements.contains_key(&element.id) {
            self.remove(&element.id.clone());
        }
        self.order.push(element.id.clone());
        self.elements.insert(element.id.clone(), element);
    }

    /// Registers `element` as the last child of `parent_id`.
    pub fn append_child(&mut self, parent_id: &str, mut element: Element) -> Result<(), FormError> {
        if !self.elements.contains_key(parent_id) {
            return Err(FormError::ElementNotFound(parent_id.to_string()));
        }
        let child_id = element.id.clone();
        element.parent = Some(parent_id.to_string());
        self.insert(element);
        if let Some(parent) = self.elements.get_mut(parent_id) {
            parent.children.push(child_id);
        }
        Ok(())
    }

    /// Removes an element and its subtree.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let removed = self.elements.remove(id)?;
        self.order.retain(|known| known != id);
        for child in &removed.children {
            self.remove(child);
        }
        if let Some(parent_id) = &removed.parent {
            if let Some(parent) = self.elements.get_mut(parent_id) {
                parent.children.retain(|child| child != id);
            }
        }
        Some(removed)
    }

    /// Removes all descendants of `id`. Returns false if `id` is unknown.
    pub fn clear_children(&mut self, id: &str) -> bool {
        let Some(children) = self.elements.get(id).map(|e| e.children.clone()) else {
            return false;
        };
        for child in children {
            self.remove(&child);
        }
        true
    }

    /// All descendants of `id` in document order.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(element) = self.elements.get(id) {
            for child in &element.children {
                out.push(child.clone());
                out.extend(self.descendants(child));
            }
        }
        out
    }

    pub fn ids_by_name(&self, name: &str) -> Vec<String> {
        self.ids_matching(|e| e.name.as_deref() == Some(name))
    }

    pub fn ids_by_class(&self, class: &str) -> Vec<String> {
        self.ids_matching(|e| e.has_class(class))
    }

    fn ids_matching(&self, predicate: impl Fn(&Element) -> bool) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.elements.get(id.as_str()).is_some_and(&predicate))
            .cloned()
            .collect()
    }
}
