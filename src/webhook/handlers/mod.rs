pub mod overseerr;
pub mod radarr;
pub mod sonarr;
pub mod tdarr;

pub use overseerr::OverseerrHandler;
pub use radarr::RadarrHandler;
pub use sonarr::SonarrHandler;
pub use tdarr::TdarrHandler;
