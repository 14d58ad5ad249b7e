//! Chat service implementation.
//!
//! `ChatService` owns the room store, the session catalog cache and the
//! favorites list, and turns every rejected transition or background failure
//! into a `Notice` on the notice channel.

use crate::fan_out::{self, DispatchOutcome};
use kuka_core::catalog::{Catalog, Model};
use kuka_core::client::{CatalogClient, ClientError, CompletionClient};
use kuka_core::error::KukaError;
use kuka_core::favorites::{Favorites, FavoritesRepository};
use kuka_core::message::Message;
use kuka_core::notice::Notice;
use kuka_core::retry::RetryPolicy;
use kuka_core::room::Room;
use kuka_core::selection::SelectionSet;
use kuka_core::state::ChatState;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock, mpsc};

/// A catalog entry decorated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub model: Model,
    pub favorite: bool,
    pub selected: bool,
}

/// A room as shown in the room list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub message_count: usize,
    pub active: bool,
}

/// Use case for the multi-model chat session.
///
/// Every state transition takes the write lock for the whole step, so callers
/// never observe a half-applied change. The service is cheap to clone; clones
/// share the same state.
#[derive(Clone)]
pub struct ChatService {
    state: Arc<RwLock<ChatState>>,
    /// Set by the first successful fetch.
    catalog: Arc<OnceCell<Catalog>>,
    favorites: Arc<RwLock<Favorites>>,
    favorites_repository: Arc<dyn FavoritesRepository>,
    catalog_client: Arc<dyn CatalogClient>,
    completion_client: Arc<dyn CompletionClient>,
    catalog_retry: RetryPolicy,
    completion_retry: RetryPolicy,
    notices: mpsc::UnboundedSender<Notice>,
}

impl ChatService {
    /// Creates a service with a single empty room and no retries.
    pub fn new(
        catalog_client: Arc<dyn CatalogClient>,
        completion_client: Arc<dyn CompletionClient>,
        favorites_repository: Arc<dyn FavoritesRepository>,
        notices: mpsc::UnboundedSender<Notice>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(ChatState::new())),
            catalog: Arc::new(OnceCell::new()),
            favorites: Arc::new(RwLock::new(Favorites::new())),
            favorites_repository,
            catalog_client,
            completion_client,
            catalog_retry: RetryPolicy::none(),
            completion_retry: RetryPolicy::none(),
            notices,
        }
    }

    /// Uses `policy` for both the catalog fetch and every completion call.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.catalog_retry = policy;
        self.completion_retry = policy;
        self
    }

    pub fn with_catalog_retry(mut self, policy: RetryPolicy) -> Self {
        self.catalog_retry = policy;
        self
    }

    pub fn with_completion_retry(mut self, policy: RetryPolicy) -> Self {
        self.completion_retry = policy;
        self
    }

    pub(crate) fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            tracing::debug!("notice receiver dropped");
        }
    }

    pub(crate) fn report(&self, err: KukaError) {
        self.notify(err.to_notice());
    }

    /// Loads favorites and the catalog concurrently.
    pub async fn initialize(&self) {
        tokio::join!(self.load_favorites(), self.load_catalog());
    }

    // ============================================================================
    // Catalog
    // ============================================================================

    /// Fetches the catalog unless this session already has it.
    ///
    /// On failure the catalog stays empty, a notice is emitted and `false` is
    /// returned. A later call tries again. Readers never wait on the fetch.
    pub async fn load_catalog(&self) -> bool {
        let client = &self.catalog_client;
        let policy = self.catalog_retry;
        let result = self
            .catalog
            .get_or_try_init(|| async move {
                let models = policy
                    .run(|| client.list_models(), ClientError::is_retryable)
                    .await?;
                tracing::info!(count = models.len(), "model catalog loaded");
                Ok::<_, ClientError>(Catalog::new(models))
            })
            .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch model catalog");
                self.notify(Notice::catalog_unavailable());
                false
            }
        }
    }

    /// The cached catalog, empty when it has not been loaded.
    pub async fn catalog(&self) -> Catalog {
        self.catalog.get().cloned().unwrap_or_default()
    }

    /// Catalog entries whose name contains `term`, favorites first.
    pub async fn browse(&self, term: &str) -> Vec<ModelEntry> {
        let Some(catalog) = self.catalog.get() else {
            return Vec::new();
        };
        let favorites = self.favorites.read().await;
        let state = self.state.read().await;

        catalog
            .browse(term, &favorites)
            .into_iter()
            .map(|model| ModelEntry {
                favorite: favorites.contains(&model.id),
                selected: state.selection().contains(&model.id),
                model: model.clone(),
            })
            .collect()
    }

    pub async fn display_name(&self, model_id: &str) -> String {
        match self.catalog.get() {
            Some(catalog) => catalog.display_name(model_id).to_string(),
            None => model_id.to_string(),
        }
    }

    // ============================================================================
    // Favorites
    // ============================================================================

    /// Loads the persisted favorites list. A read failure leaves the list
    /// empty and emits a notice.
    pub async fn load_favorites(&self) {
        match self.favorites_repository.load().await {
            Ok(loaded) => {
                tracing::debug!(count = loaded.ids().len(), "favorites loaded");
                *self.favorites.write().await = loaded;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load favorites");
                self.report(err);
            }
        }
    }

    /// Flips favorite membership and persists the list.
    ///
    /// Returns whether the model is now a favorite. The in-memory change is
    /// kept even when persisting fails.
    pub async fn toggle_favorite(&self, model_id: &str) -> bool {
        let mut favorites = self.favorites.write().await;
        let now_favorite = favorites.toggle(model_id);

        // The lock is held across the write so saves land in toggle order.
        if let Err(err) = self.favorites_repository.save(&favorites).await {
            tracing::warn!(error = %err, model = model_id, "failed to persist favorites");
            self.report(err);
        }
        now_favorite
    }

    pub async fn favorites(&self) -> Favorites {
        self.favorites.read().await.clone()
    }

    // ============================================================================
    // Selection
    // ============================================================================

    /// Returns whether the model is selected after the toggle.
    pub async fn toggle_select(&self, model_id: &str) -> bool {
        self.state.write().await.toggle_select(model_id)
    }

    pub async fn set_model_active(&self, model_id: &str, active: bool) {
        self.state.write().await.set_model_active(model_id, active);
    }

    /// Returns the new active flag, or `None` when the model is not selected.
    pub async fn toggle_model_active(&self, model_id: &str) -> Option<bool> {
        self.state.write().await.toggle_model_active(model_id)
    }

    pub async fn set_instruction(&self, model_id: &str, instruction: &str) {
        self.state
            .write()
            .await
            .set_instruction(model_id, instruction);
    }

    pub async fn remove_model(&self, model_id: &str) {
        self.state.write().await.remove_model(model_id);
    }

    pub async fn clear_models(&self) {
        let notice = self.state.write().await.clear_models();
        self.notify(notice);
    }

    pub async fn selection(&self) -> SelectionSet {
        self.state.read().await.selection().clone()
    }

    // ============================================================================
    // Rooms
    // ============================================================================

    /// Creates a room from the current selection. Returns its index, or `None`
    /// after emitting a notice when nothing is selected.
    pub async fn create_room(&self) -> Option<usize> {
        let result = self.state.write().await.create_room_with_selection();
        match result {
            Ok(index) => {
                tracing::info!(index, "room created from selection");
                Some(index)
            }
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    /// Starts a new empty chat at the top of the list and switches to it.
    pub async fn new_chat(&self) -> Room {
        let mut state = self.state.write().await;
        let room = state.create_and_activate().clone();
        tracing::info!(room = %room.name, "new chat started");
        room
    }

    pub async fn rename_room(&self, index: usize, name: &str) -> bool {
        self.state.write().await.rename(index, name)
    }

    /// Deletes the room at `index`. Returns the removed room, or `None` after
    /// emitting a notice.
    pub async fn delete_room(&self, index: usize) -> Option<Room> {
        let result = self.state.write().await.delete(index);
        match result {
            Ok(room) => {
                tracing::info!(room = %room.name, "room deleted");
                Some(room)
            }
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    pub async fn switch_room(&self, index: usize) -> bool {
        let result = self.state.write().await.switch_to(index);
        match result {
            Ok(()) => true,
            Err(err) => {
                self.report(err);
                false
            }
        }
    }

    pub async fn clear_chat(&self) {
        let notice = self.state.write().await.clear_chat();
        self.notify(notice);
    }

    pub async fn rooms(&self) -> Vec<RoomSummary> {
        let state = self.state.read().await;
        state
            .rooms()
            .iter()
            .enumerate()
            .map(|(index, room)| summarize(&state, index, room))
            .collect()
    }

    /// Rooms whose name contains `term`, case-insensitive.
    pub async fn search_rooms(&self, term: &str) -> Vec<RoomSummary> {
        let state = self.state.read().await;
        state
            .search(term)
            .into_iter()
            .map(|(index, room)| summarize(&state, index, room))
            .collect()
    }

    pub async fn active_room(&self) -> RoomSummary {
        let state = self.state.read().await;
        summarize(&state, state.active_index(), state.active_room())
    }

    /// The on-screen transcript of the active room.
    pub async fn transcript(&self) -> Vec<Message> {
        self.state.read().await.transcript().to_vec()
    }

    /// A consistent copy of the whole chat state.
    pub async fn snapshot(&self) -> ChatState {
        self.state.read().await.clone()
    }

    // ============================================================================
    // Messaging
    // ============================================================================

    /// Sends `text` to every active model of the active room.
    ///
    /// The replies are committed to the room the message was sent from, in
    /// selection order, once every request has finished.
    pub async fn send_message(&self, text: &str) -> DispatchOutcome {
        let begun = self.state.write().await.begin_dispatch(text);
        let pending = match begun {
            Ok(Some(pending)) => pending,
            Ok(None) => return DispatchOutcome::Ignored,
            Err(err) => {
                self.report(err);
                return DispatchOutcome::Rejected;
            }
        };

        tracing::info!(
            room = %pending.room_name,
            models = pending.requests.len(),
            "dispatching message"
        );

        let replies = match fan_out::collect_replies(
            Arc::clone(&self.completion_client),
            self.completion_retry,
            pending.requests,
        )
        .await
        {
            Ok(replies) => replies,
            Err(err) => {
                tracing::error!(error = %err, room = %pending.room_name, "dispatch failed");
                self.notify(Notice::dispatch_failed());
                return DispatchOutcome::Failed;
            }
        };

        let committed = self
            .state
            .write()
            .await
            .commit_replies(&pending.room_id, replies.clone());
        match committed {
            Ok(count) => {
                tracing::debug!(count, room = %pending.room_name, "replies committed");
                DispatchOutcome::Completed {
                    room_id: pending.room_id,
                    replies,
                }
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!(room = %pending.room_name, "origin room deleted, replies discarded");
                self.notify(Notice::room_closed(&pending.room_name));
                DispatchOutcome::Discarded {
                    room_name: pending.room_name,
                }
            }
            Err(err) => {
                self.report(err);
                DispatchOutcome::Failed
            }
        }
    }
}

fn summarize(state: &ChatState, index: usize, room: &Room) -> RoomSummary {
    RoomSummary {
        index,
        id: room.id.clone(),
        name: room.name.clone(),
        message_count: room.message_count(),
        active: room.id == state.active_room_id(),
    }
}
