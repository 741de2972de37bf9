// --- File: crates/terminwahl_form/src/page.rs ---
//! The booking page: element registry, current location and the queue of
//! browser-level effects (reloads, navigation, alerts) the host applies.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::FormError;
use crate::fields;
use crate::registry::{Command, Element, ElementRegistry};

/// Key code of the Enter key.
pub const KEY_ENTER: u32 = 13;

/// A key released on an element. Only Enter triggers actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other(u32),
}

impl Key {
    pub fn from_key_code(code: u32) -> Self {
        if code == KEY_ENTER {
            Key::Enter
        } else {
            Key::Other(code)
        }
    }

    pub fn is_enter(self) -> bool {
        self == Key::Enter
    }
}

/// Browser-level side effects requested by the page scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "target", rename_all = "snake_case")]
pub enum PageEffect {
    Reload,
    Navigate { url: String },
    OpenWindow { url: String },
    Alert(String),
    JumpTo(String),
    Close,
}

#[derive(Debug, Clone)]
pub struct Page {
    url: String,
    registry: ElementRegistry,
    effects: Vec<PageEffect>,
    focused: Option<String>,
}

/// Page shared between async components (fetch callbacks, timers).
pub type SharedPage = Arc<Mutex<Page>>;

/// Runs `f` with exclusive access to the shared page.
///
/// A panic in another holder does not make the page unusable.
pub fn with_page<R>(page: &SharedPage, f: impl FnOnce(&mut Page) -> R) -> R {
    let mut guard = page.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

impl Page {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            registry: ElementRegistry::new(),
            effects: Vec::new(),
            focused: None,
        }
    }

    pub fn into_shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolves `reference` against the page location, like a relative link.
    pub fn resolve(&self, reference: &str) -> Result<Url, FormError> {
        let base = Url::parse(&self.url).map_err(|e| FormError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        base.join(reference).map_err(|e| FormError::InvalidUrl {
            url: reference.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.registry.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.registry.get_mut(id)
    }

    /// Registers a top-level element.
    pub fn add(&mut self, element: Element) -> &mut Self {
        self.registry.insert(element);
        self
    }

    /// Registers a child element below `parent`.
    pub fn add_child(&mut self, parent: &str, element: Element) -> Result<&mut Self, FormError> {
        self.registry.append_child(parent, element)?;
        Ok(self)
    }

    pub fn emit(&mut self, effect: PageEffect) {
        debug!("Page effect: {:?}", effect);
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[PageEffect] {
        &self.effects
    }

    pub fn drain_effects(&mut self) -> Vec<PageEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.emit(PageEffect::Alert(message.into()));
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Moves keyboard focus. `None` when the element is missing or cannot take focus.
    pub fn focus(&mut self, id: &str) -> Option<()> {
        let element = self.registry.get(id)?;
        if !element.is_focusable() {
            return None;
        }
        self.focused = Some(id.to_string());
        Some(())
    }

    /// Pointer activation: runs the element's commands.
    pub fn click(&mut self, id: &str) -> Result<(), FormError> {
        let commands = self.registry.require(id)?.on_activate.clone();
        self.focused = Some(id.to_string());
        for command in &commands {
            self.run_command(command)?;
        }
        Ok(())
    }

    /// Keyboard activation: runs the element's commands on Enter only.
    pub fn key_up(&mut self, id: &str, key: Key) -> Result<(), FormError> {
        let commands = self.registry.require(id)?.on_activate.clone();
        if !key.is_enter() {
            return Ok(());
        }
        for command in &commands {
            self.run_command(command)?;
        }
        Ok(())
    }

    pub fn run_command(&mut self, command: &Command) -> Result<(), FormError> {
        match command {
            Command::Enable(id) => fields::enable(self, id),
            Command::SetValue { id, value } => fields::set_value(self, id, value),
            Command::SetBorder { id, name, class } => fields::set_border(self, id, name, class),
        }
    }
}
