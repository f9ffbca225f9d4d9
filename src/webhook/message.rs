//! The normalized notification message produced by source handlers.

use chrono::DateTime;
use chrono::Utc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

impl NotificationAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_url: None,
        }
    }

    pub fn with_icon(name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_url: Some(icon_url.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl NotificationField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

impl NotificationFooter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_url: None,
        }
    }

    pub fn with_icon(text: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_url: Some(icon_url.into()),
        }
    }
}

/// Rendered notification, ready for delivery. Built by one source handler
/// per inbound payload and discarded after fan-out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub author: NotificationAuthor,
    pub title: String,
    pub description: String,
    pub color: u32,
    /// Field order is part of each handler's contract.
    pub fields: Vec<NotificationField>,
    pub thumbnail: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub footer: Option<NotificationFooter>,
}

impl Notification {
    /// Returns a copy whose footer text is extended with `suffix`,
    /// preserving any existing footer text and icon.
    pub fn with_footer_suffix(&self, suffix: &str) -> Notification {
        let mut copy = self.clone();
        copy.footer = Some(match &self.footer {
            Some(footer) => NotificationFooter {
                text: combine_footer_text(Some(&footer.text), suffix),
                icon_url: footer.icon_url.clone(),
            },
            None => NotificationFooter::new(combine_footer_text(None, suffix)),
        });
        copy
    }
}

/// Combines an existing footer text with a suffix. The suffix never
/// replaces existing text.
pub fn combine_footer_text(existing: Option<&str>, suffix: &str) -> String {
    match existing {
        Some(text) if !text.is_empty() => format!("{} • {}", text, suffix),
        _ => suffix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> Notification {
        Notification {
            author: NotificationAuthor::new("Radarr"),
            title: "title".to_string(),
            description: "description".to_string(),
            color: 0x7289da,
            fields: vec![],
            thumbnail: None,
            timestamp: Utc::now(),
            footer: None,
        }
    }

    #[test]
    fn test_footer_suffix_without_existing_footer() {
        let suffixed = notification().with_footer_suffix("[RADARR] Delivered to 2 server(s)");
        assert_eq!(
            suffixed.footer.unwrap().text,
            "[RADARR] Delivered to 2 server(s)"
        );
    }

    #[test]
    fn test_footer_suffix_preserves_existing_text_and_icon() {
        let mut n = notification();
        n.footer = Some(NotificationFooter::with_icon("Radarr", "https://example.test/logo.png"));

        let suffixed = n.with_footer_suffix("[RADARR] Delivered to 1 server(s)");
        let footer = suffixed.footer.unwrap();
        assert_eq!(footer.text, "Radarr • [RADARR] Delivered to 1 server(s)");
        assert_eq!(footer.icon_url.as_deref(), Some("https://example.test/logo.png"));
    }

    #[test]
    fn test_combine_footer_text_with_empty_existing() {
        assert_eq!(combine_footer_text(Some(""), "suffix"), "suffix");
    }
}
