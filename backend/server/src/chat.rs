//! # Chat Stream
//!
//! `GET /api/chat?q=` answers over server-sent events:
//! - `meta`: query, summary and confidence, sent immediately
//! - `token`: one answer token per configured interval
//! - `final`: sources and next steps
//! - `done`: literal `done`
//!
//! A client that disconnects drops the stream, which drops its pending sleep with it.
use std::convert::Infallible;

use async_stream::stream;
use axum::{
    extract::{Query, State},
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{error::AppError, state::SharedState};

#[derive(Deserialize)]
pub struct ChatParams {
    q: Option<String>,
}

fn json_event(name: &str, value: &Value) -> Event {
    Event::default().event(name).data(value.to_string())
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Query(params): Query<ChatParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(AppError::MissingQuery)?
        .to_string();

    let answer = state.responder.generate(&query);
    let tokens = state.responder.tokenize(&answer.answer);
    let period = state.config.chat_token_interval;

    info!("Streaming {} tokens for chat query", tokens.len());

    let events = stream! {
        yield Ok::<Event, Infallible>(json_event(
            "meta",
            &json!({
                "query": query,
                "summary": answer.summary,
                "confidence": answer.confidence,
            }),
        ));

        for token in tokens {
            sleep(period).await;
            yield Ok(Event::default().event("token").data(token));
        }

        sleep(period).await;
        yield Ok(json_event(
            "final",
            &json!({ "sources": answer.sources, "nextSteps": answer.next_steps }),
        ));
        yield Ok(Event::default().event("done").data("done"));

        debug!("Chat stream finished");
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
