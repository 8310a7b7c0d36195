use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;
use crate::infrastructure::events::bus::CatalogEvent;
use crate::state::AppState;

/// Catalog change notifications as server-sent events
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "`content-changed` events", content_type = "text/event-stream")
    ),
    tag = "Content"
)]
pub async fn catalog_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        let event = match rx.recv().await {
            Ok(event) => event,
            // Missed some, but the client only needs to know it should re-fetch.
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "SSE subscriber lagged");
                CatalogEvent::ContentChanged
            }
            Err(RecvError::Closed) => return None,
        };
        Some((Ok(Event::default().event(event.name()).data("{}")), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
