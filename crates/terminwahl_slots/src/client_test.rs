#[cfg(test)]
mod tests {
    use crate::client::{FetchOutcome, SlotFetcher, LOADING_HTML};
    use crate::models::SlotQuery;
    use chrono::NaiveDate;
    use reqwest::Client;
    use terminwahl_form::{with_page, Display, Element, Key, Page, PageEffect, SharedPage};
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query() -> SlotQuery {
        SlotQuery {
            service_id: 147,
            location_id: 2,
            opening_hours_ids: vec![7, 8],
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            token: "tok".to_string(),
        }
    }

    fn page_url(server: &MockServer) -> String {
        format!("{}/frontend/terminauswahl.php", server.uri())
    }

    fn booking_page(server: &MockServer) -> SharedPage {
        let mut page = Page::new(page_url(server));
        page.add(Element::new("zeitenliste", "div"));
        page.add(Element::new("meindatum", "span"));
        page.add(Element::new("datum", "input"));
        page.add(Element::new("weiterbutton", "button").disabled(true));
        page.add(Element::new("zeit", "input"));
        page.add(Element::new("oid", "input"));
        page.add(Element::new("stornobuergerid", "input"));
        page.add(Element::new("unterlagen", "div"));
        page.into_shared()
    }

    fn fetcher(server: &MockServer) -> SlotFetcher {
        SlotFetcher::new(Client::new(), &page_url(server)).unwrap()
    }

    #[tokio::test]
    async fn test_get_zeiten_renders_bookable_slots() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ajax/zeitensammlung.php"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("anliegen%5B%5D=147"))
            .and(body_string_contains("datum=2025-03-07"))
            .and(body_string_contains("OID=7%2C8"))
            .and(body_string_contains("token=tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"zeit":"09:00:00","oeffnungszeitid":7,"buchbar":true,"standortname":"A"},
                    {"zeit":"09:15:00","oeffnungszeitid":7,"buchbar":false,"standortname":"A"}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let page = booking_page(&server);
        let outcome = fetcher(&server).get_zeiten(&page, &query()).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Slots(ref slots) if slots.len() == 2));

        with_page(&page, |page| {
            let list = page.element("zeitenliste").unwrap();
            assert_eq!(list.children, vec!["09:00".to_string()]);
            assert_eq!(list.inner_html, "");
            assert_eq!(page.element("09:00").unwrap().inner_html, " 09:00 ");
            assert_eq!(page.element("meindatum").unwrap().inner_html, "07.03.2025");
            assert_eq!(page.element("datum").unwrap().value, "2025-03-07");
            assert_eq!(page.focused(), Some("09:00"));
            assert!(page.effects().is_empty());
        });
    }

    #[tokio::test]
    async fn test_get_zeiten_sentinel_only_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#""Fehler""#))
            .mount(&server)
            .await;

        let page = booking_page(&server);
        let outcome = fetcher(&server).get_zeiten(&page, &query()).await.unwrap();
        assert_eq!(outcome, FetchOutcome::SessionExpired);

        with_page(&page, |page| {
            assert_eq!(page.effects(), &[PageEffect::Reload]);
            assert_eq!(page.element("zeitenliste").unwrap().inner_html, LOADING_HTML);
            assert_eq!(page.element("datum").unwrap().value, "");
            assert_eq!(page.element("meindatum").unwrap().inner_html, "");
        });
    }

    #[tokio::test]
    async fn test_get_zeiten_non_200_is_a_no_op() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let page = booking_page(&server);
        let outcome = fetcher(&server).get_zeiten(&page, &query()).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Unhandled(500));
        with_page(&page, |page| {
            assert!(page.effects().is_empty());
            assert_eq!(page.element("zeitenliste").unwrap().inner_html, LOADING_HTML);
        });
    }

    #[tokio::test]
    async fn test_other_message_means_no_slots() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#""keine Termine""#))
            .mount(&server)
            .await;

        let outcome = fetcher(&server).fetch_slots(&query()).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Slots(Vec::new()));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        assert!(fetcher(&server).fetch_slots(&query()).await.is_err());
    }

    #[tokio::test]
    async fn test_get_zeiten_on_enter_ignores_other_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let page = booking_page(&server);
        let fetcher = fetcher(&server);
        let skipped = fetcher
            .get_zeiten_on_enter(Key::Other(65), &page, &query())
            .await
            .unwrap();
        assert!(skipped.is_none());
        let done = fetcher
            .get_zeiten_on_enter(Key::Enter, &page, &query())
            .await
            .unwrap();
        assert_eq!(done, Some(FetchOutcome::Slots(Vec::new())));
    }

    #[tokio::test]
    async fn test_get_documents_loads_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ajax/unterlageneinesanliegens.php"))
            .and(query_param("anliegenid", "147"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#""<ul><li>Pass</li></ul>""#))
            .expect(1)
            .mount(&server)
            .await;

        let page = booking_page(&server);
        let fetcher = fetcher(&server);
        assert!(fetcher.get_documents(&page, "unterlagen", 147, "en").await.unwrap());
        // already filled, no second request
        assert!(!fetcher.get_documents(&page, "unterlagen", 147, "en").await.unwrap());
        with_page(&page, |page| {
            assert_eq!(
                page.element("unterlagen").unwrap().inner_html,
                "<ul><li>Pass</li></ul>"
            );
        });
    }

    #[tokio::test]
    async fn test_get_documents_skips_hidden_container() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#""x""#))
            .expect(0)
            .mount(&server)
            .await;

        let page = booking_page(&server);
        with_page(&page, |page| {
            page.element_mut("unterlagen")
                .unwrap()
                .set_display(Display::None, false)
        });
        let loaded = fetcher(&server)
            .get_documents(&page, "unterlagen", 147, "de")
            .await
            .unwrap();
        assert!(!loaded);
        assert!(fetcher(&server)
            .get_documents(&page, "missing", 147, "de")
            .await
            .is_err());
    }

    #[test]
    fn test_endpoint_urls() {
        let fetcher =
            SlotFetcher::new(Client::new(), "https://lbv-termine.de/frontend/terminauswahl.php")
                .unwrap();
        assert_eq!(
            fetcher.slots_url().unwrap().as_str(),
            "https://lbv-termine.de/ajax/zeitensammlung.php"
        );
        assert_eq!(
            fetcher.documents_url(147, "de").unwrap().as_str(),
            "https://lbv-termine.de/ajax/unterlageneinesanliegens.php?anliegenid=147&language=de"
        );
        assert!(SlotFetcher::new(Client::new(), "not a url").is_err());
    }
}
