use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("Unknown webhook source `{token}`")]
pub struct UnknownSourceError {
    pub token: String,
}

/// The upstream services whose webhooks this bot understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WebhookSource {
    Overseerr,
    Radarr,
    Sonarr,
    Tdarr,
}

impl WebhookSource {
    pub const ALL: [WebhookSource; 4] = [
        WebhookSource::Overseerr,
        WebhookSource::Radarr,
        WebhookSource::Sonarr,
        WebhookSource::Tdarr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookSource::Overseerr => "overseerr",
            WebhookSource::Radarr => "radarr",
            WebhookSource::Sonarr => "sonarr",
            WebhookSource::Tdarr => "tdarr",
        }
    }

    /// Source branding used in embed footers and authors.
    pub fn display_name(&self) -> &'static str {
        match self {
            WebhookSource::Overseerr => "Overseerr",
            WebhookSource::Radarr => "Radarr",
            WebhookSource::Sonarr => "Sonarr",
            WebhookSource::Tdarr => "Tdarr",
        }
    }
}

impl fmt::Display for WebhookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookSource {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overseerr" => Ok(WebhookSource::Overseerr),
            "radarr" => Ok(WebhookSource::Radarr),
            "sonarr" => Ok(WebhookSource::Sonarr),
            "tdarr" => Ok(WebhookSource::Tdarr),
            _ => Err(UnknownSourceError {
                token: s.to_string(),
            }),
        }
    }
}
