#[cfg(test)]
mod tests {
    use crate::fields::*;
    use crate::page::{Key, Page};
    use crate::registry::{Display, Element};

    fn representation_page() -> Page {
        let mut page = Page::new("https://example.org/frontend/terminauswahl.php");
        page.add(Element::new("vertretung", "input"));
        page.add(Element::new("vollmachtangabe", "div").with_display(Display::None));
        page.add(Element::new("vollmacht_vorname", "input"));
        page.add(Element::new("vollmacht_nachname", "input"));
        page.add(Element::new("othercheckbox", "input"));
        page.add(Element::new("mecheckbox", "input").checked(true));
        page.add(Element::new("choiceme", "span"));
        page
    }

    fn slot_page() -> Page {
        let mut page = Page::new("https://example.org/frontend/terminauswahl.php");
        page.add(Element::new("zeitenliste", "div"));
        for id in ["09:00", "09:15"] {
            page.add_child(
                "zeitenliste",
                Element::new(id, "div")
                    .with_name("zeiten")
                    .with_classes(["bluetext", "whiteborder"]),
            )
            .unwrap();
        }
        page.add(Element::new("storno", "div").with_class("stornotermin"));
        page
    }

    #[test]
    fn test_representation_checked() {
        let mut page = representation_page();
        page.element_mut("vertretung").unwrap().checked = true;
        set_vertretung(&mut page, "vertretung").unwrap();

        assert_eq!(
            page.element("vollmachtangabe").unwrap().style.display,
            Display::Block
        );
        assert!(page.element("vollmacht_vorname").unwrap().required);
        assert!(page.element("vollmacht_nachname").unwrap().required);
        assert!(page.element("othercheckbox").unwrap().checked);
        assert!(!page.element("mecheckbox").unwrap().checked);
        assert!(page.element("choiceme").unwrap().is_hidden());
    }

    #[test]
    fn test_representation_unchecked_reverses_everything() {
        let mut page = representation_page();
        set_representation(&mut page, true);
        set_representation(&mut page, false);

        assert!(page.element("vollmachtangabe").unwrap().is_hidden());
        assert!(!page.element("vollmacht_vorname").unwrap().required);
        assert!(!page.element("vollmacht_nachname").unwrap().required);
        assert!(!page.element("othercheckbox").unwrap().checked);
        assert!(page.element("mecheckbox").unwrap().checked);
        assert_eq!(
            page.element("choiceme").unwrap().style.display,
            Display::Inline
        );
    }

    #[test]
    fn test_representation_skips_missing_elements() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("mecheckbox", "input"));
        set_representation(&mut page, false);
        assert!(page.element("mecheckbox").unwrap().checked);
        assert!(set_vertretung(&mut page, "vertretung").is_err());
    }

    #[test]
    fn test_set_border_marks_only_selected_slot() {
        let mut page = slot_page();
        set_border(&mut page, "09:15", "zeiten", "stornotermin").unwrap();

        let selected = page.element("09:15").unwrap();
        assert!(!selected.has_class("bluetext"));
        assert!(!selected.has_class("whiteborder"));
        assert_eq!(selected.style.border.as_deref(), Some("3px solid #007bff"));
        assert_eq!(selected.style.background_color.as_deref(), Some("#007bff"));
        assert_eq!(selected.style.color.as_deref(), Some("white"));

        let other = page.element("09:00").unwrap();
        assert!(other.has_class("bluetext"));
        assert_eq!(other.style.border.as_deref(), Some("3px solid white"));
        assert_eq!(other.style.color.as_deref(), Some("#005ca9"));

        let cancelled = page.element("storno").unwrap();
        assert_eq!(
            cancelled.style.background_color.as_deref(),
            Some("lightcoral")
        );
    }

    #[test]
    fn test_reselecting_moves_the_selection() {
        let mut page = slot_page();
        set_border(&mut page, "09:15", "zeiten", "stornotermin").unwrap();
        set_border_on_enter(&mut page, Key::Enter, "09:00", "zeiten", "stornotermin").unwrap();

        assert!(page.element("09:15").unwrap().has_class("whiteborder"));
        assert!(!page.element("09:00").unwrap().has_class("whiteborder"));
    }

    #[test]
    fn test_set_border_missing_selection_is_error() {
        let mut page = slot_page();
        assert!(set_border(&mut page, "10:00", "zeiten", "stornotermin").is_err());
        // nothing was restyled
        assert!(page.element("09:00").unwrap().style.border.is_none());
    }

    #[test]
    fn test_check_checkbox_enables_button() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("datenschutz", "input").checked(true));
        page.add(Element::new("weiterbutton", "button").disabled(true));
        check_checkbox(&mut page, "datenschutz", "weiterbutton").unwrap();
        assert!(!page.element("weiterbutton").unwrap().disabled);

        page.element_mut("datenschutz").unwrap().checked = false;
        check_checkbox(&mut page, "datenschutz", "weiterbutton").unwrap();
        assert!(page.element("weiterbutton").unwrap().disabled);
    }

    #[test]
    fn test_check_firma() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("firma", "select").with_value("sonstige"));
        page.add(Element::new("firmafreitextgroup", "div").with_display(Display::None));
        page.add_child(
            "firmafreitextgroup",
            Element::new("firmafreitext", "input").with_value("ACME"),
        )
        .unwrap();
        page.add(Element::new("vorname", "input").with_value("Erika"));

        check_firma(&mut page).unwrap();
        assert_eq!(
            page.element("firmafreitextgroup").unwrap().style.display,
            Display::Block
        );
        assert_eq!(page.element("firmafreitext").unwrap().value, "ACME");
        assert_eq!(page.element("vorname").unwrap().value, "");

        page.element_mut("firma").unwrap().value = "adac".to_string();
        check_firma(&mut page).unwrap();
        assert!(page.element("firmafreitextgroup").unwrap().is_hidden());
        assert_eq!(page.element("firmafreitext").unwrap().value, "");
    }

    #[test]
    fn test_switch_checkbox_moves_required_flags() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("firmacheck", "input").checked(true));
        page.add(Element::new("firmagroup", "div"));
        page.add_child("firmagroup", Element::new("firmenname", "input"))
            .unwrap();
        page.add_child("firmagroup", Element::new("hint", "span"))
            .unwrap();
        page.add(Element::new("persongroup", "div"));
        page.add_child("persongroup", Element::new("nachname", "input").required(true))
            .unwrap();

        switch_checkbox(&mut page, "firmacheck", "firmagroup", "persongroup").unwrap();
        assert!(page.element("firmenname").unwrap().required);
        assert!(!page.element("hint").unwrap().required);
        assert!(!page.element("nachname").unwrap().required);
        assert!(page.element("persongroup").unwrap().is_hidden());
        assert_eq!(
            page.element("firmagroup").unwrap().style.display,
            Display::Block
        );
    }

    #[test]
    fn test_set_label_updates_placeholder_and_label() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("firmacheck", "input"));
        page.add(Element::new("nachname", "input"));
        page.add(Element::new("nachnamelabel", "label"));

        set_label(&mut page, "firmacheck", "nachname", "Nachname", "Firma").unwrap();
        assert_eq!(
            page.element("nachname").unwrap().placeholder.as_deref(),
            Some("Nachname")
        );
        page.element_mut("firmacheck").unwrap().checked = true;
        set_label(&mut page, "firmacheck", "nachname", "Nachname", "Firma").unwrap();
        assert_eq!(page.element("nachnamelabel").unwrap().inner_html, "Firma");
    }

    #[test]
    fn test_required_and_checked_report_missing() {
        let mut page = Page::new("https://example.org/");
        assert!(!set_required(&mut page, "nothing", true));
        assert!(!set_required_by_id(&mut page, "nothing", true));
        assert!(!set_checked(&mut page, "nothing", true));
    }

    #[test]
    fn test_clear_not_required_keeps_required_value() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("a", "input").with_value("x").required(true));
        page.add(Element::new("b", "input").with_value("y"));
        clear_not_required(&mut page, "a").unwrap();
        clear_not_required(&mut page, "b").unwrap();
        assert_eq!(page.element("a").unwrap().value, "x");
        assert_eq!(page.element("b").unwrap().value, "");
    }

    #[test]
    fn test_on_enter_variants_ignore_other_keys() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("zeit", "input"));
        page.add(Element::new("weiterbutton", "button").disabled(true));

        set_value_on_enter(&mut page, Key::Other(32), "zeit", "09:00:00").unwrap();
        enable_on_enter(&mut page, Key::Other(32), "weiterbutton").unwrap();
        assert_eq!(page.element("zeit").unwrap().value, "");
        assert!(page.element("weiterbutton").unwrap().disabled);

        set_value_on_enter(&mut page, Key::Enter, "zeit", "09:00:00").unwrap();
        enable_on_enter(&mut page, Key::Enter, "weiterbutton").unwrap();
        assert_eq!(page.element("zeit").unwrap().value, "09:00:00");
        assert!(!page.element("weiterbutton").unwrap().disabled);
    }
}
