//! Concurrent per-model requests for one user turn.

use futures::future::join_all;
use kuka_core::client::{ClientError, CompletionClient};
use kuka_core::message::Message;
use kuka_core::retry::RetryPolicy;
use kuka_core::state::OutboundRequest;
use std::sync::Arc;
use tokio::task::JoinError;

/// Result of `ChatService::send_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The text was blank; nothing happened.
    Ignored,
    /// No active model was selected; a notice was emitted.
    Rejected,
    /// Every model answered (or had its failure substituted) and the replies
    /// were committed to the origin room.
    Completed {
        room_id: String,
        replies: Vec<Message>,
    },
    /// The origin room was deleted while the requests were in flight.
    Discarded { room_name: String },
    /// The round failed as a whole; nothing was appended.
    Failed,
}

/// Runs one task per request and returns the replies in request order.
///
/// A failed request becomes an `"Error: ..."` reply for that model. A task
/// that panics or is cancelled fails the whole round.
pub(crate) async fn collect_replies(
    client: Arc<dyn CompletionClient>,
    policy: RetryPolicy,
    requests: Vec<OutboundRequest>,
) -> Result<Vec<Message>, JoinError> {
    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let client = Arc::clone(&client);
            tokio::spawn(request_reply(client, policy, request))
        })
        .collect();

    join_all(handles).await.into_iter().collect()
}

async fn request_reply(
    client: Arc<dyn CompletionClient>,
    policy: RetryPolicy,
    request: OutboundRequest,
) -> Message {
    let OutboundRequest { model_id, prompt } = request;
    let result = policy
        .run(
            || client.complete(&model_id, &prompt),
            ClientError::is_retryable,
        )
        .await;

    match result {
        Ok(content) => Message::assistant(model_id, content),
        Err(err) => {
            tracing::warn!(model = %model_id, error = %err, "model request failed");
            Message::assistant(model_id, format!("Error: {err}"))
        }
    }
}
