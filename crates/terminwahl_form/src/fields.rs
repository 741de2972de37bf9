// --- File: crates/terminwahl_form/src/fields.rs ---
//! Form field state: values, required flags, check boxes, labels and the
//! selection styling of the time slot boxes.

use tracing::debug;

use crate::error::FormError;
use crate::page::{Key, Page};
use crate::registry::Display;
use crate::visibility::{hide, show};

/// Value of the company select that reveals the free text group.
pub const FIRMA_OTHER: &str = "sonstige";

const UNSELECTED_BORDER: &str = "3px solid white";
const UNSELECTED_COLOR: &str = "#005ca9";
const SELECTED_BORDER: &str = "3px solid #007bff";
const SELECTED_COLOR: &str = "white";
const SELECTED_BACKGROUND: &str = "#007bff";
const CANCELLED_BACKGROUND: &str = "lightcoral";
const TEXT_CLASS: &str = "bluetext";
const BORDER_CLASS: &str = "whiteborder";

// Element ids of the representation (Vollmacht) block
const AUTHORIZATION_BLOCK: &str = "vollmachtangabe";
const AUTHORIZATION_FIRST_NAME: &str = "vollmacht_vorname";
const AUTHORIZATION_LAST_NAME: &str = "vollmacht_nachname";
const OTHER_CHECKBOX: &str = "othercheckbox";
const ME_CHECKBOX: &str = "mecheckbox";
const CHOICE_ME: &str = "choiceme";

/// Enables `button` exactly when `checkbox` is checked.
pub fn check_checkbox(page: &mut Page, checkbox: &str, button: &str) -> Result<(), FormError> {
    let checked = page.registry().require(checkbox)?.checked;
    page.registry_mut().require_mut(button)?.disabled = !checked;
    Ok(())
}

/// Reveals the free text company group for "sonstige", otherwise hides and
/// clears it. The first name is cleared either way.
pub fn check_firma(page: &mut Page) -> Result<(), FormError> {
    let firma = page.registry().require("firma")?.value.clone();
    let group = page.registry_mut().require_mut("firmafreitextgroup")?;
    if firma == FIRMA_OTHER {
        group.set_display(Display::Block, true);
    } else {
        group.set_display(Display::None, true);
        group.value.clear();
        for id in page.registry().descendants("firmafreitextgroup") {
            if let Some(input) = page.element_mut(&id) {
                input.value.clear();
            }
        }
    }
    clear_value(page, "vorname")
}

pub fn clear_not_required(page: &mut Page, id: &str) -> Result<(), FormError> {
    let element = page.registry_mut().require_mut(id)?;
    if !element.required {
        element.value.clear();
    }
    Ok(())
}

pub fn clear_value(page: &mut Page, id: &str) -> Result<(), FormError> {
    page.registry_mut().require_mut(id)?.value.clear();
    Ok(())
}

/// Shows one of two groups depending on a check box and moves the required
/// flags along with it.
pub fn switch_checkbox(
    page: &mut Page,
    checkbox: &str,
    show_id: &str,
    hide_id: &str,
) -> Result<(), FormError> {
    let checked = page.registry().require(checkbox)?.checked;
    let (visible, hidden) = if checked {
        (show_id, hide_id)
    } else {
        (hide_id, show_id)
    };
    page.registry_mut()
        .require_mut(visible)?
        .set_display(Display::Block, true);
    set_required(page, visible, true);
    page.registry_mut()
        .require_mut(hidden)?
        .set_display(Display::None, true);
    set_required(page, hidden, false);
    Ok(())
}

/// Sets placeholder and label text of `elem` depending on a check box.
/// The label element has the id `<elem>label`.
pub fn set_label(
    page: &mut Page,
    checkbox: &str,
    elem: &str,
    label: &str,
    label_checked: &str,
) -> Result<(), FormError> {
    let text = if page.registry().require(checkbox)?.checked {
        label_checked
    } else {
        label
    };
    page.registry_mut().require_mut(elem)?.placeholder = Some(text.to_string());
    page.registry_mut()
        .require_mut(&format!("{elem}label"))?
        .inner_html = text.to_string();
    Ok(())
}

/// Sets the required flag on every input and select inside `container`.
/// Returns false when the container does not exist.
pub fn set_required(page: &mut Page, container: &str, required: bool) -> bool {
    if page.element(container).is_none() {
        return false;
    }
    for id in page.registry().descendants(container) {
        if let Some(element) = page.element_mut(&id) {
            if matches!(element.tag.as_str(), "input" | "select") {
                element.required = required;
            }
        }
    }
    true
}

pub fn set_required_by_id(page: &mut Page, id: &str, required: bool) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            element.required = required;
            true
        }
        None => false,
    }
}

pub fn set_checked(page: &mut Page, id: &str, checked: bool) -> bool {
    match page.element_mut(id) {
        Some(element) => {
            element.checked = checked;
            true
        }
        None => false,
    }
}

/// Switches between booking for oneself and booking as a representative.
///
/// Representing someone shows the authorization block and makes its two
/// name fields required; booking for oneself reverses that and shows the
/// "choiceme" control again. Missing elements are skipped.
pub fn set_representation(page: &mut Page, represent: bool) {
    if represent {
        show(page, AUTHORIZATION_BLOCK);
    } else {
        hide(page, AUTHORIZATION_BLOCK);
    }
    set_required_by_id(page, AUTHORIZATION_FIRST_NAME, represent);
    set_required_by_id(page, AUTHORIZATION_LAST_NAME, represent);
    set_checked(page, OTHER_CHECKBOX, represent);
    set_checked(page, ME_CHECKBOX, !represent);
    if represent {
        hide(page, CHOICE_ME);
    } else if let Some(choice) = page.element_mut(CHOICE_ME) {
        choice.set_display(Display::Inline, false);
    }
    debug!("Representation set to {}", represent);
}

/// `set_representation` driven by the state of a check box.
pub fn set_vertretung(page: &mut Page, checkbox: &str) -> Result<(), FormError> {
    let checked = page.registry().require(checkbox)?.checked;
    set_representation(page, checked);
    Ok(())
}

/// Marks `id` as the selected slot box.
///
/// Every element named `name` is reset to the unselected style, every element
/// with `class` gets the unselected style on a cancelled-slot background.
pub fn set_border(page: &mut Page, id: &str, name: &str, class: &str) -> Result<(), FormError> {
    page.registry().require(id)?;

    for other in page.registry().ids_by_name(name) {
        if let Some(element) = page.element_mut(&other) {
            element.style.border = Some(UNSELECTED_BORDER.to_string());
            element.style.color = Some(UNSELECTED_COLOR.to_string());
            element.style.background_color = Some("white".to_string());
            element.classes.insert(TEXT_CLASS.to_string());
            element.classes.insert(BORDER_CLASS.to_string());
        }
    }
    for other in page.registry().ids_by_class(class) {
        if let Some(element) = page.element_mut(&other) {
            element.style.border = Some(UNSELECTED_BORDER.to_string());
            element.style.color = Some(UNSELECTED_COLOR.to_string());
            element.style.background_color = Some(CANCELLED_BACKGROUND.to_string());
            element.classes.insert(TEXT_CLASS.to_string());
            element.classes.insert(BORDER_CLASS.to_string());
        }
    }

    let selected = page.registry_mut().require_mut(id)?;
    selected.classes.remove(TEXT_CLASS);
    selected.classes.remove(BORDER_CLASS);
    selected.style.border = Some(SELECTED_BORDER.to_string());
    selected.style.color = Some(SELECTED_COLOR.to_string());
    selected.style.background_color = Some(SELECTED_BACKGROUND.to_string());
    Ok(())
}

pub fn set_border_on_enter(
    page: &mut Page,
    key: Key,
    id: &str,
    name: &str,
    class: &str,
) -> Result<(), FormError> {
    if key.is_enter() {
        set_border(page, id, name, class)?;
    }
    Ok(())
}

pub fn set_value(page: &mut Page, id: &str, value: &str) -> Result<(), FormError> {
    page.registry_mut().require_mut(id)?.value = value.to_string();
    Ok(())
}

pub fn set_value_on_enter(page: &mut Page, key: Key, id: &str, value: &str) -> Result<(), FormError> {
    if key.is_enter() {
        set_value(page, id, value)?;
    }
    Ok(())
}

pub fn enable(page: &mut Page, id: &str) -> Result<(), FormError> {
    page.registry_mut().require_mut(id)?.disabled = false;
    Ok(())
}

pub fn enable_on_enter(page: &mut Page, key: Key, id: &str) -> Result<(), FormError> {
    if key.is_enter() {
        enable(page, id)?;
    }
    Ok(())
}
