use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::events::dtos::{EventRecord, NewEvent, TagEntry};

/// Persistence collaborator for classified events and the tag catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: NewEvent) -> Result<EventRecord>;

    async fn find(&self, id: i64) -> Result<Option<EventRecord>>;

    /// Replace the stored record with the same id. Fails if it does not exist.
    async fn update(&self, event: EventRecord) -> Result<EventRecord>;

    /// Record catalogue entries for tags not seen before. Existing entries keep
    /// their original category.
    async fn register_tags(&self, entries: Vec<TagEntry>) -> Result<()>;
}

#[derive(Default)]
struct MemoryStore {
    next_id: i64,
    events: BTreeMap<i64, EventRecord>,
    tags: BTreeMap<String, TagEntry>,
}

/// In-process store so the server runs without a database.
#[derive(Default)]
pub struct MemoryEventRepository {
    store: Mutex<MemoryStore>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tag_catalogue(&self) -> Vec<TagEntry> {
        self.store.lock().await.tags.values().cloned().collect()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<EventRecord> {
        let mut store = self.store.lock().await;
        store.next_id += 1;

        let record = EventRecord {
            id: store.next_id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            tags: event.tags,
            category: event.category,
            impact_score: event.impact_score,
        };
        store.events.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i64) -> Result<Option<EventRecord>> {
        Ok(self.store.lock().await.events.get(&id).cloned())
    }

    async fn update(&self, event: EventRecord) -> Result<EventRecord> {
        let mut store = self.store.lock().await;
        match store.events.get_mut(&event.id) {
            Some(slot) => {
                *slot = event.clone();
                Ok(event)
            }
            None => Err(anyhow!("event {} not found", event.id)),
        }
    }

    async fn register_tags(&self, entries: Vec<TagEntry>) -> Result<()> {
        let mut store = self.store.lock().await;
        for entry in entries {
            store.tags.entry(entry.name.clone()).or_insert(entry);
        }
        Ok(())
    }
}
