//! Webhook notification routing and rendering pipeline.
//!
//! Inbound payloads flow through the [`router::Dispatcher`] to one
//! [`handler::SourceHandler`] (validate, enrich, render) and on to
//! [`delivery::deliver`] (resolve subscribers, fan out, admin copy).

pub mod context;
pub mod delivery;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod handlers;
pub mod message;
pub mod resolver;
pub mod router;
pub mod source;
pub mod util;
