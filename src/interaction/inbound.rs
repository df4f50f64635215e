//! Entry point for events coming off the socket.

use tracing::{Instrument, debug, error, instrument};

use crate::{base::types::InboundEvent, interaction::listeners::Listeners, service::chat::ChatClient};

/// Handles an inbound event.
///
/// Spawns a new task that dispatches the event to the listeners, so that the socket
/// callback can acknowledge the event immediately. Failures are logged and only
/// affect this event.
#[instrument(skip_all)]
pub fn handle_inbound_event(event: InboundEvent, listeners: Listeners, chat: ChatClient) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = listeners.dispatch(event, &chat).await;

            // Log the outcome.
            match result {
                Ok(handled) => debug!("Dispatched event (handled: {}).", handled),
                Err(err) => error!("Error while handling: {}", err),
            }
        }
        .in_current_span(),
    );
}
