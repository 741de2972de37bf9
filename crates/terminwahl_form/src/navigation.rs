// --- File: crates/terminwahl_form/src/navigation.rs ---
//! Navigation effects and e-mail hashing.

use sha2::{Digest, Sha256};

use crate::error::FormError;
use crate::page::{Key, Page, PageEffect};

pub fn reload(page: &mut Page) {
    page.emit(PageEffect::Reload);
}

/// Scrolls to the anchor `anchor` without leaving a fragment in the URL.
pub fn jump(page: &mut Page, anchor: &str) {
    page.emit(PageEffect::JumpTo(anchor.to_string()));
}

/// Opens `url` (relative to the page) in this window or a new one.
pub fn call_url(page: &mut Page, url: &str, new_window: bool) -> Result<(), FormError> {
    let url = page.resolve(url)?.to_string();
    if new_window {
        page.emit(PageEffect::OpenWindow { url });
    } else {
        page.emit(PageEffect::Navigate { url });
    }
    Ok(())
}

pub fn call_on_enter(page: &mut Page, key: Key, url: &str, new_window: bool) -> Result<(), FormError> {
    if key.is_enter() {
        call_url(page, url, new_window)?;
    }
    Ok(())
}

pub fn close_window(page: &mut Page) {
    page.emit(PageEffect::Close);
}

/// Lower-case hex SHA-256 of the UTF-8 bytes of `email`.
pub fn hash_email(email: &str) -> String {
    hex::encode(Sha256::digest(email.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_email() {
        assert_eq!(
            hash_email(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_email("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_email("Max@Example.de").len(), 64);
    }

    #[test]
    fn test_call_url_resolves_against_page() {
        let mut page = Page::new("https://example.org/frontend/terminauswahl.php");
        call_url(&mut page, "index.php", false).unwrap();
        call_url(&mut page, "https://other.example/help", true).unwrap();
        assert_eq!(
            page.drain_effects(),
            vec![
                PageEffect::Navigate {
                    url: "https://example.org/frontend/index.php".to_string()
                },
                PageEffect::OpenWindow {
                    url: "https://other.example/help".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_call_on_enter_only_for_enter() {
        let mut page = Page::new("https://example.org/");
        call_on_enter(&mut page, Key::Other(9), "a.php", false).unwrap();
        assert!(page.effects().is_empty());
        call_on_enter(&mut page, Key::Enter, "a.php", false).unwrap();
        assert_eq!(page.effects().len(), 1);
    }

    #[test]
    fn test_simple_effects() {
        let mut page = Page::new("https://example.org/");
        reload(&mut page);
        jump(&mut page, "top");
        close_window(&mut page);
        assert_eq!(
            page.drain_effects(),
            vec![
                PageEffect::Reload,
                PageEffect::JumpTo("top".to_string()),
                PageEffect::Close
            ]
        );
    }
}
