// --- File: crates/terminwahl_slots/src/render.rs ---
//! Turns bookable slots into selectable boxes in the slot list.

use terminwahl_form::visibility::set_content;
use terminwahl_form::{Command, Element, FormError, Page};
use tracing::debug;

use crate::models::TimeSlot;

pub const SLOT_CONTAINER: &str = "zeitenliste";
pub const SLOT_NAME: &str = "zeiten";
pub const CANCELLED_SLOT_CLASS: &str = "stornotermin";
pub const CONTINUE_BUTTON: &str = "weiterbutton";
pub const TIME_FIELD: &str = "zeit";
pub const CANCELLED_CITIZEN_FIELD: &str = "stornobuergerid";
pub const OPENING_HOURS_FIELD: &str = "oid";

pub const SLOT_CLASSES: [&str; 7] = [
    "float-left",
    "mb-1",
    "LBVBox-minwidth",
    "bluetext",
    "cursor-pointer",
    "hoverable",
    "whiteborder",
];

/// Label of a slot box. Without a location filter the location name is shown.
pub fn slot_label(slot: &TimeSlot, location_id: i64) -> String {
    if location_id > 0 {
        format!(" {} ", slot.short_time())
    } else {
        format!(" {}: {} ", slot.short_time(), slot.standortname)
    }
}

/// What selecting a slot does, in order.
pub fn slot_commands(slot: &TimeSlot) -> Vec<Command> {
    vec![
        Command::Enable(CONTINUE_BUTTON.to_string()),
        Command::SetValue {
            id: TIME_FIELD.to_string(),
            value: slot.full_time(),
        },
        Command::SetValue {
            id: CANCELLED_CITIZEN_FIELD.to_string(),
            value: String::new(),
        },
        Command::SetValue {
            id: OPENING_HOURS_FIELD.to_string(),
            value: slot.oeffnungszeitid.to_string(),
        },
        Command::SetBorder {
            id: slot.short_time(),
            name: SLOT_NAME.to_string(),
            class: CANCELLED_SLOT_CLASS.to_string(),
        },
    ]
}

pub fn slot_element(slot: &TimeSlot, location_id: i64) -> Element {
    Element::new(slot.short_time(), "div")
        .with_name(SLOT_NAME)
        .with_classes(SLOT_CLASSES)
        .with_tab_index(0)
        .with_html(slot_label(slot, location_id))
        .with_commands(slot_commands(slot))
}

/// Replaces the slot list with one box per bookable slot, in server order.
///
/// Returns the id of the first box. A second slot at the same minute (another
/// location) is skipped, since box ids must be unique.
pub fn render_slots(
    page: &mut Page,
    slots: &[TimeSlot],
    location_id: i64,
) -> Result<Option<String>, FormError> {
    if !set_content(page, SLOT_CONTAINER, "") {
        return Err(FormError::ElementNotFound(SLOT_CONTAINER.to_string()));
    }

    let mut first = None;
    for slot in slots.iter().filter(|slot| slot.buchbar) {
        let id = slot.short_time();
        if page.element(&id).is_some() {
            debug!("Skipping second slot at {} ({})", id, slot.standortname);
            continue;
        }
        page.add_child(SLOT_CONTAINER, slot_element(slot, location_id))?;
        first.get_or_insert(id);
    }
    Ok(first)
}
