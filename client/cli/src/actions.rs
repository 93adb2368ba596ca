//! Per-entry actions
//!
//! Which actions a deployment offers is configuration, not code: the set is
//! described by `EnabledActions` in the config file.

use crate::types::FileEntry;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Public https link of the item
    CopyLink,
    /// Preview image bytes
    CopyImage,
    /// Full file served as an attachment
    Download,
    CopyPrice,
    /// "<name> - <price>"
    CopyNamePrice,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::CopyLink,
        Action::CopyImage,
        Action::Download,
        Action::CopyPrice,
        Action::CopyNamePrice,
    ];

    /// Binary actions go through the client instead of producing text.
    pub fn is_binary(self) -> bool {
        matches!(self, Action::CopyImage | Action::Download)
    }

    pub fn needs_price(self) -> bool {
        matches!(self, Action::CopyPrice | Action::CopyNamePrice)
    }

    /// Text produced by a text action. `None` for binary actions and for
    /// price actions on an entry without a price.
    pub fn text_payload(self, entry: &FileEntry) -> Option<String> {
        match self {
            Action::CopyLink => Some(entry.https_url.clone()),
            Action::CopyPrice => entry.price.as_ref().map(|p| p.to_string()),
            Action::CopyNamePrice => entry
                .price
                .as_ref()
                .map(|p| format!("{} - {}", entry.label(), p)),
            Action::CopyImage | Action::Download => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledActions {
    pub copy_link: bool,
    pub copy_image: bool,
    pub download: bool,
    pub copy_price: bool,
    pub copy_name_price: bool,
}

impl Default for EnabledActions {
    fn default() -> Self {
        Self {
            copy_link: true,
            copy_image: true,
            download: true,
            copy_price: true,
            copy_name_price: true,
        }
    }
}

impl EnabledActions {
    fn slot(&mut self, action: Action) -> &mut bool {
        match action {
            Action::CopyLink => &mut self.copy_link,
            Action::CopyImage => &mut self.copy_image,
            Action::Download => &mut self.download,
            Action::CopyPrice => &mut self.copy_price,
            Action::CopyNamePrice => &mut self.copy_name_price,
        }
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        match action {
            Action::CopyLink => self.copy_link,
            Action::CopyImage => self.copy_image,
            Action::Download => self.download,
            Action::CopyPrice => self.copy_price,
            Action::CopyNamePrice => self.copy_name_price,
        }
    }

    pub fn set(&mut self, action: Action, enabled: bool) {
        *self.slot(action) = enabled;
    }

    pub fn iter_enabled(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.is_enabled(*a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Price;

    fn entry(price: Option<Price>) -> FileEntry {
        FileEntry {
            name: "IMG_0042.jpg".into(),
            display_name: "Linen shirt".into(),
            preview_url: "/api/preview/IMG_0042.jpg".into(),
            https_url: "https://example.com/photos/IMG_0042.jpg".into(),
            price,
            stock: Some(3),
        }
    }

    #[test]
    fn test_text_payloads() {
        let e = entry(Some(Price::Text("$12.00".into())));
        assert_eq!(
            Action::CopyLink.text_payload(&e).as_deref(),
            Some("https://example.com/photos/IMG_0042.jpg")
        );
        assert_eq!(Action::CopyPrice.text_payload(&e).as_deref(), Some("$12.00"));
        assert_eq!(
            Action::CopyNamePrice.text_payload(&e).as_deref(),
            Some("Linen shirt - $12.00")
        );
        assert_eq!(Action::Download.text_payload(&e), None);
        assert_eq!(Action::CopyImage.text_payload(&e), None);
    }

    #[test]
    fn test_price_actions_without_price() {
        let e = entry(None);
        assert_eq!(Action::CopyPrice.text_payload(&e), None);
        assert_eq!(Action::CopyNamePrice.text_payload(&e), None);
        assert!(Action::CopyLink.text_payload(&e).is_some());
    }

    #[test]
    fn test_enabled_set() {
        let mut enabled = EnabledActions::default();
        assert_eq!(enabled.iter_enabled().count(), 5);

        enabled.set(Action::CopyImage, false);
        enabled.set(Action::CopyNamePrice, false);
        assert!(!enabled.is_enabled(Action::CopyImage));
        assert_eq!(
            enabled.iter_enabled().collect::<Vec<_>>(),
            vec![Action::CopyLink, Action::Download, Action::CopyPrice]
        );
    }
}
