// --- File: crates/terminwahl_slots/src/client.rs ---
//! Slot and document requests of the booking page.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use terminwahl_form::visibility::set_content;
use terminwahl_form::{fields, with_page, FormError, Key, Page, PageEffect, SharedPage};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::SlotError;
use crate::models::{DocumentList, SlotQuery, SlotResponse, TimeSlot};
use crate::render::{render_slots, SLOT_CONTAINER};

pub const SLOTS_ENDPOINT: &str = "../ajax/zeitensammlung.php";
pub const DOCUMENTS_ENDPOINT: &str = "../ajax/unterlageneinesanliegens.php";
pub const LOADING_HTML: &str = "<span class=\"loading\"><img src=\"img/ajax-loading.gif\"></span>";
pub const DATE_DISPLAY: &str = "meindatum";
pub const DATE_FIELD: &str = "datum";

// Containers with this much content already hold their document list
const DOCUMENTS_LOADED_LEN: usize = 5;

/// Result of one slot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Slots(Vec<TimeSlot>),
    /// The server answered with the error sentinel; the page must reload.
    SessionExpired,
    /// Any status other than 200. Nothing is done with the body.
    Unhandled(u16),
}

/// Talks to the slot endpoints relative to a booking page URL.
#[derive(Debug, Clone)]
pub struct SlotFetcher {
    client: Client,
    page_url: Url,
}

fn join(base: &Url, reference: &str) -> Result<Url, SlotError> {
    base.join(reference).map_err(|e| {
        SlotError::Form(FormError::InvalidUrl {
            url: reference.to_string(),
            reason: e.to_string(),
        })
    })
}

impl SlotFetcher {
    pub fn new(client: Client, page_url: &str) -> Result<Self, SlotError> {
        let page_url = Url::parse(page_url).map_err(|e| {
            SlotError::Form(FormError::InvalidUrl {
                url: page_url.to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(Self { client, page_url })
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn slots_url(&self) -> Result<Url, SlotError> {
        join(&self.page_url, SLOTS_ENDPOINT)
    }

    pub fn documents_url(&self, service_id: u32, language: &str) -> Result<Url, SlotError> {
        let mut url = join(&self.page_url, DOCUMENTS_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("anliegenid", &service_id.to_string())
            .append_pair("language", language);
        Ok(url)
    }

    /// One slot request relative to the configured page URL.
    pub async fn fetch_slots(&self, query: &SlotQuery) -> Result<FetchOutcome, SlotError> {
        let endpoint = self.slots_url()?;
        self.post_slots(endpoint, query).await
    }

    async fn post_slots(&self, endpoint: Url, query: &SlotQuery) -> Result<FetchOutcome, SlotError> {
        let body = query.form_body()?;
        debug!("POST {} for {}", endpoint, query.iso_date());
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Slot request for {} answered {}", query.iso_date(), status);
            return Ok(FetchOutcome::Unhandled(status.as_u16()));
        }

        let text = response.text().await?;
        match SlotResponse::parse(&text)? {
            SlotResponse::Slots(slots) => Ok(FetchOutcome::Slots(slots)),
            response if response.is_error_sentinel() => {
                info!("Slot request for {} hit the session error", query.iso_date());
                Ok(FetchOutcome::SessionExpired)
            }
            SlotResponse::Message(message) => {
                info!("Slot request for {} returned \"{}\"", query.iso_date(), message);
                Ok(FetchOutcome::Slots(Vec::new()))
            }
        }
    }

    /// Loads the slots of `query.date` into the page.
    ///
    /// Shows the loading placeholder, then either renders the bookable slots
    /// and fills the date fields, or requests a reload on the error sentinel.
    /// The request goes to the endpoint next to the page's own URL.
    pub async fn get_zeiten(
        &self,
        page: &SharedPage,
        query: &SlotQuery,
    ) -> Result<FetchOutcome, SlotError> {
        let endpoint = with_page(page, |page| {
            set_content(page, SLOT_CONTAINER, LOADING_HTML);
            page.resolve(SLOTS_ENDPOINT)
        })?;

        let outcome = self.post_slots(endpoint, query).await?;
        match &outcome {
            FetchOutcome::Slots(slots) => {
                with_page(page, |page| show_slots(page, slots, query))?;
            }
            FetchOutcome::SessionExpired => {
                with_page(page, |page| page.emit(PageEffect::Reload));
            }
            FetchOutcome::Unhandled(_) => {}
        }
        Ok(outcome)
    }

    pub async fn get_zeiten_on_enter(
        &self,
        key: Key,
        page: &SharedPage,
        query: &SlotQuery,
    ) -> Result<Option<FetchOutcome>, SlotError> {
        if !key.is_enter() {
            return Ok(None);
        }
        self.get_zeiten(page, query).await.map(Some)
    }

    /// Fills `id` with the document list of a service, unless it is hidden or
    /// already filled. Returns whether the list was loaded.
    pub async fn get_documents(
        &self,
        page: &SharedPage,
        id: &str,
        service_id: u32,
        language: &str,
    ) -> Result<bool, SlotError> {
        let endpoint = with_page(page, |page| -> Result<Option<Url>, SlotError> {
            let element = page.registry().require(id)?;
            if element.inner_html.chars().count() >= DOCUMENTS_LOADED_LEN || element.is_hidden() {
                return Ok(None);
            }
            let mut url = page.resolve(DOCUMENTS_ENDPOINT)?;
            url.query_pairs_mut()
                .append_pair("anliegenid", &service_id.to_string())
                .append_pair("language", language);
            Ok(Some(url))
        })?;
        let Some(endpoint) = endpoint else {
            return Ok(false);
        };

        debug!("GET {}", endpoint);
        let response = self.client.get(endpoint).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("Document request for service {} answered {}", service_id, status);
            return Ok(false);
        }
        let html = DocumentList::parse(&response.text().await?)?.into_html();

        with_page(page, |page| match page.element_mut(id) {
            Some(element) => {
                element.inner_html = html;
                Ok(true)
            }
            None => {
                warn!("Document container {} disappeared", id);
                Ok(false)
            }
        })
    }
}

fn show_slots(page: &mut Page, slots: &[TimeSlot], query: &SlotQuery) -> Result<(), FormError> {
    let first = render_slots(page, slots, query.location_id)?;
    set_content(page, DATE_DISPLAY, &query.display_date());
    fields::set_value(page, DATE_FIELD, &query.iso_date())?;
    if let Some(first) = first {
        if page.focus(&first).is_none() {
            debug!("Could not focus slot {}", first);
        }
    }
    Ok(())
}
