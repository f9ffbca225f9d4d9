//! arrcord - a Discord bot bridging media-server webhooks into channels.
//!
//! This crate provides a Discord bot implementation with features including:
//! - Webhook notification routing for Overseerr, Radarr, Sonarr and Tdarr
//! - Per-guild channel subscriptions with an administrative audit trail
//! - A small slash-command surface for server operators

pub mod bot;
pub mod config;
pub mod database;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod media;
pub mod server;
pub mod service;
pub mod webhook;
