// --- File: crates/terminwahl_slots/src/models.rs ---
//! Wire types of the slot and document endpoints.
//!
//! Responses are parsed into these types right at the network boundary;
//! nothing downstream sees raw JSON.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SlotError;

/// String the slot endpoint returns when the session is no longer valid.
pub const ERROR_SENTINEL: &str = "Fehler";

/// One candidate appointment time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeSlot {
    /// Start time, sent as `HH:MM:SS`.
    pub zeit: NaiveTime,
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub oeffnungszeitid: u64,
    #[serde(deserialize_with = "flag_from_bool_or_int")]
    pub buchbar: bool,
    #[serde(default)]
    pub standortname: String,
}

impl TimeSlot {
    /// `HH:MM`, used as element id and label.
    pub fn short_time(&self) -> String {
        self.zeit.format("%H:%M").to_string()
    }

    /// `HH:MM:SS` as sent by the server.
    pub fn full_time(&self) -> String {
        self.zeit.format("%H:%M:%S").to_string()
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(id) => Ok(id),
        Id::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid opening hours id: {text}"))),
    }
}

fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => Ok(flag),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "invalid bookable flag: {other}"
        ))),
    }
}

/// Body of the slot endpoint: a slot list or a bare string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResponse {
    Slots(Vec<TimeSlot>),
    Message(String),
}

impl SlotResponse {
    pub fn parse(body: &str) -> Result<Self, SlotError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| SlotError::Parse(e.to_string()))?;
        match value {
            Value::String(message) => Ok(SlotResponse::Message(message)),
            Value::Array(_) => serde_json::from_value(value)
                .map(SlotResponse::Slots)
                .map_err(|e| SlotError::Parse(format!("invalid time slot: {e}"))),
            other => Err(SlotError::Parse(format!(
                "expected slot list or string, got {other}"
            ))),
        }
    }

    pub fn is_error_sentinel(&self) -> bool {
        matches!(self, SlotResponse::Message(message) if message == ERROR_SENTINEL)
    }
}

/// Document list of a service, delivered as ready-made HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentList {
    Html(String),
    Fragments(Vec<String>),
}

impl DocumentList {
    pub fn parse(body: &str) -> Result<Self, SlotError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| SlotError::Parse(e.to_string()))?;
        match value {
            Value::String(html) => Ok(DocumentList::Html(html)),
            Value::Array(_) => serde_json::from_value(value)
                .map(DocumentList::Fragments)
                .map_err(|e| SlotError::Parse(format!("invalid document list: {e}"))),
            other => Err(SlotError::Parse(format!(
                "expected document HTML, got {other}"
            ))),
        }
    }

    pub fn into_html(self) -> String {
        match self {
            DocumentList::Html(html) => html,
            DocumentList::Fragments(fragments) => fragments.concat(),
        }
    }
}

/// Parameters of one slot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub service_id: u32,
    /// Location filter; zero or less means all locations.
    pub location_id: i64,
    pub opening_hours_ids: Vec<u32>,
    pub date: NaiveDate,
    pub token: String,
}

impl SlotQuery {
    /// Form encoded request body.
    pub fn form_body(&self) -> Result<String, SlotError> {
        let opening_hours = self
            .opening_hours_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let fields = [
            ("anliegen[]", self.service_id.to_string()),
            ("datum", self.iso_date()),
            ("OID", opening_hours),
            ("token", self.token.clone()),
        ];
        Ok(serde_urlencoded::to_string(&fields[..])?)
    }

    /// `YYYY-MM-DD`
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `DD.MM.YYYY`
    pub fn display_date(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }

    pub fn for_date(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}
