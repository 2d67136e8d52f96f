use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(stream_events))
}

/// GET /api/events
///
/// Server-sent events for every session change, named after the event kind.
async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default().event(event.kind()).json_data(&event).ok().map(Ok),
            Err(err) => {
                warn!("Event subscriber fell behind: {}", err);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
