//! Dispatch router: payload in, delivery result out.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use log::error;
use log::info;
use log::warn;
use serde_json::Value;

use crate::webhook::context::NotifyContext;
use crate::webhook::delivery;
use crate::webhook::delivery::DeliveryResult;
use crate::webhook::handler::SourceHandler;
use crate::webhook::handlers::OverseerrHandler;
use crate::webhook::handlers::RadarrHandler;
use crate::webhook::handlers::SonarrHandler;
use crate::webhook::handlers::TdarrHandler;
use crate::webhook::source::WebhookSource;

/// Closed dispatch table built at startup, one handler per source.
pub struct Dispatcher {
    handlers: HashMap<WebhookSource, Arc<dyn SourceHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_handlers(vec![
            Arc::new(OverseerrHandler),
            Arc::new(RadarrHandler),
            Arc::new(SonarrHandler),
            Arc::new(TdarrHandler),
        ])
    }

    pub fn with_handlers(handlers: Vec<Arc<dyn SourceHandler>>) -> Self {
        Self {
            handlers: handlers
                .into_iter()
                .map(|handler| (handler.source(), handler))
                .collect(),
        }
    }

    /// Runs one payload through its source handler and the fan-out. Always
    /// returns a structured result; handler faults are caught here and
    /// converted into a synthetic failure entry.
    pub async fn dispatch(
        &self,
        ctx: &NotifyContext,
        source: WebhookSource,
        payload: &Value,
    ) -> DeliveryResult {
        let Some(handler) = self.handlers.get(&source) else {
            warn!("No handler registered for source `{}`", source);
            return DeliveryResult::empty();
        };

        match handler.handle_notification(ctx, payload).await {
            Ok(Some(notification)) => {
                let result = delivery::deliver(ctx, source, &notification, Some(payload)).await;
                if result.has_failures() {
                    error!(
                        "Delivered {} notification to {} destination(s) with {} failure(s): {}",
                        source,
                        result.total_sent,
                        result.failed.len(),
                        result.failed.join("; ")
                    );
                } else {
                    info!(
                        "Delivered {} notification to {} destination(s)",
                        source, result.total_sent
                    );
                }
                result
            }
            Ok(None) => {
                debug!("No notification produced for {} payload", source);
                DeliveryResult::empty()
            }
            Err(e) => {
                error!(
                    "Handler for {} failed: {} (payload: {})",
                    source, e, payload
                );
                DeliveryResult::failure(format!("Handler error for {}: {}", source, e))
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
