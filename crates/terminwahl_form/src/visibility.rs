// --- File: crates/terminwahl_form/src/visibility.rs ---
//! Showing, hiding and replacing element content.
//!
//! Single-element helpers return `false` when the element does not exist;
//! group helpers return how many elements they touched.

use tracing::{debug, error};

use crate::error::FormError;
use crate::page::Page;
use crate::registry::Display;

pub const PLUS_LABEL: &str = "&nbsp;+&nbsp;";
pub const MINUS_LABEL: &str = "&nbsp;&ndash;&nbsp;";
const MODAL_SHOWN_CLASS: &str = "show";

/// Shows an element as block, overriding stylesheet rules.
pub fn show(page: &mut Page, id: &str) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            element.set_display(Display::Block, true);
            true
        }
        None => false,
    }
}

pub fn hide(page: &mut Page, id: &str) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            element.set_display(Display::None, false);
            true
        }
        None => false,
    }
}

pub fn show_by_name(page: &mut Page, name: &str) -> usize {
    let ids = page.registry().ids_by_name(name);
    for id in &ids {
        if let Some(element) = page.element_mut(id) {
            element.set_display(Display::Block, false);
        }
    }
    ids.len()
}

/// Hides every descendant of `container_id` whose name (or, without a name, id)
/// starts with `prefix`.
pub fn hide_elements_starting_with(
    page: &mut Page,
    prefix: &str,
    container_id: &str,
) -> Result<usize, FormError> {
    if page.element(container_id).is_none() {
        error!("Container with id \"{}\" not found", container_id);
        return Err(FormError::ElementNotFound(container_id.to_string()));
    }

    let mut hidden = 0;
    for id in page.registry().descendants(container_id) {
        let Some(element) = page.element_mut(&id) else {
            continue;
        };
        let element_name = match element.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => element.id.clone(),
        };
        if !element_name.is_empty() && element_name.starts_with(prefix) {
            element.set_display(Display::None, false);
            hidden += 1;
        }
    }
    Ok(hidden)
}

/// Replaces the content of an element, dropping its child elements.
pub fn set_content(page: &mut Page, id: &str, html: &str) -> bool {
    if !page.registry_mut().clear_children(id) {
        return false;
    }
    match page.element_mut(id) {
        Some(element) => {
            element.inner_html = html.to_string();
            true
        }
        None => false,
    }
}

pub fn add_content(page: &mut Page, id: &str, html: &str) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            element.inner_html.push_str(html);
            true
        }
        None => false,
    }
}

/// Flips between shown (block) and hidden.
pub fn toggle(page: &mut Page, id: &str) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            if element.style.display == Display::Block {
                element.set_display(Display::None, false);
            } else {
                element.set_display(Display::Block, true);
            }
            true
        }
        None => false,
    }
}

/// Flips an expander label between "+" and "–".
pub fn toggle_plus_minus(page: &mut Page, id: &str) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            element.inner_html = if element.inner_html == PLUS_LABEL {
                MINUS_LABEL.to_string()
            } else {
                PLUS_LABEL.to_string()
            };
            true
        }
        None => false,
    }
}

pub fn hide_all(page: &mut Page, class: &str) -> usize {
    let ids = page.registry().ids_by_class(class);
    for id in &ids {
        if let Some(element) = page.element_mut(id) {
            element.set_display(Display::None, false);
        }
    }
    ids.len()
}

pub fn show_modal(page: &mut Page, id: &str) -> bool {
    debug!("show #{}", id);
    match page.element_mut(id) {
        Some(element) => {
            element.classes.insert(MODAL_SHOWN_CLASS.to_string());
            element.set_display(Display::Block, false);
            true
        }
        None => false,
    }
}

pub fn hide_modal(page: &mut Page, id: &str) -> bool {
    debug!("hide #{}", id);
    match page.element_mut(id) {
        Some(element) => {
            element.classes.remove(MODAL_SHOWN_CLASS);
            element.set_display(Display::None, false);
            true
        }
        None => false,
    }
}
