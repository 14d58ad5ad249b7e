#![allow(dead_code)]

use async_trait::async_trait;
use kuka_application::ChatService;
use kuka_core::catalog::Model;
use kuka_core::client::{CatalogClient, ClientError, CompletionClient};
use kuka_core::error::{KukaError, Result};
use kuka_core::favorites::{Favorites, FavoritesRepository};
use kuka_core::notice::Notice;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub fn model(id: &str, name: &str) -> Model {
    Model {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
    }
}

/// Catalog client returning a fixed list, or failing the first `failures` calls.
pub struct MockCatalogClient {
    models: Vec<Model>,
    failures: AtomicUsize,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl MockCatalogClient {
    pub fn new(models: Vec<Model>) -> Self {
        Self {
            models,
            failures: AtomicUsize::new(0),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            models: vec![model("m1", "Model One")],
            failures: AtomicUsize::new(failures),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn list_models(&self) -> std::result::Result<Vec<Model>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ClientError::Http {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.models.clone())
    }
}

/// How a mock model answers.
#[derive(Clone)]
pub enum Behavior {
    Reply { delay: Duration },
    Fail(ClientError),
    Panic,
}

/// Completion client echoing `"{model}: {prompt}"` after a per-model delay.
#[derive(Default)]
pub struct MockCompletionClient {
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, model_id: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(model_id.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> std::result::Result<String, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((model_id.to_string(), prompt.to_string()));

        let behavior = self
            .behaviors
            .get(model_id)
            .cloned()
            .unwrap_or(Behavior::Reply {
                delay: Duration::ZERO,
            });
        match behavior {
            Behavior::Reply { delay } => {
                tokio::time::sleep(delay).await;
                Ok(format!("{model_id}: {prompt}"))
            }
            Behavior::Fail(err) => Err(err),
            Behavior::Panic => panic!("model {model_id} crashed"),
        }
    }
}

/// In-memory favorites store recording every save.
#[derive(Default)]
pub struct MockFavoritesRepository {
    stored: Mutex<Favorites>,
    fail_saves: bool,
    pub saves: AtomicUsize,
}

impl MockFavoritesRepository {
    pub fn with_favorites(ids: &[&str]) -> Self {
        Self {
            stored: Mutex::new(Favorites::from_ids(
                ids.iter().map(|id| id.to_string()).collect(),
            )),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Favorites {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavoritesRepository for MockFavoritesRepository {
    async fn load(&self) -> Result<Favorites> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, favorites: &Favorites) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(KukaError::io("disk full"));
        }
        *self.stored.lock().unwrap() = favorites.clone();
        Ok(())
    }
}

pub struct Harness {
    pub service: ChatService,
    pub catalog: Arc<MockCatalogClient>,
    pub completion: Arc<MockCompletionClient>,
    pub favorites: Arc<MockFavoritesRepository>,
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

impl Harness {
    pub fn new(
        catalog: MockCatalogClient,
        completion: MockCompletionClient,
        favorites: MockFavoritesRepository,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let completion = Arc::new(completion);
        let favorites = Arc::new(favorites);
        let (tx, notices) = mpsc::unbounded_channel();
        let service = ChatService::new(
            catalog.clone(),
            completion.clone(),
            favorites.clone(),
            tx,
        );
        Self {
            service,
            catalog,
            completion,
            favorites,
            notices,
        }
    }

    pub fn with_completion(completion: MockCompletionClient) -> Self {
        Self::new(
            MockCatalogClient::new(vec![model("m1", "Model One")]),
            completion,
            MockFavoritesRepository::default(),
        )
    }

    /// Notices emitted so far.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut drained = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            drained.push(notice);
        }
        drained
    }
}
