use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::AthleteStore;
use crate::error::{Result, StorageError};
use crate::models::{Athlete, AthleteFields};
use crate::query::{AthleteFilter, Page, PageRequest};

#[derive(Debug, Default)]
struct MemoryState {
    athletes: BTreeMap<i64, Athlete>,
    last_id: i64,
}

/// Process-local athlete store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryAthleteStore {
    state: RwLock<MemoryState>,
}

impl InMemoryAthleteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AthleteStore for InMemoryAthleteStore {
    async fn find_page(
        &self,
        filter: &AthleteFilter,
        request: &PageRequest,
    ) -> Result<Page<Athlete>> {
        let state = self.state.read().await;

        let mut matching: Vec<&Athlete> = state
            .athletes
            .values()
            .filter(|athlete| filter.matches(athlete))
            .collect();
        matching.sort_by(|a, b| request.sort.compare(a, b));

        let total_elements = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(request.limit() as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, request, total_elements))
    }

    async fn find_all(&self) -> Result<Vec<Athlete>> {
        let state = self.state.read().await;
        Ok(state.athletes.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Athlete>> {
        let state = self.state.read().await;
        Ok(state.athletes.get(&id).cloned())
    }

    async fn exists_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        birth_timestamp: i64,
    ) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.athletes.values().any(|a| {
            a.first_name == first_name
                && a.last_name == last_name
                && a.birth_timestamp == birth_timestamp
        }))
    }

    async fn insert(&self, fields: &AthleteFields) -> Result<Athlete> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let athlete = Athlete::from_fields(state.last_id, fields.clone());
        state.athletes.insert(athlete.id, athlete.clone());
        Ok(athlete)
    }

    async fn update(&self, id: i64, fields: &AthleteFields) -> Result<Athlete> {
        let mut state = self.state.write().await;
        let slot = state
            .athletes
            .get_mut(&id)
            .ok_or(StorageError::NotFound { id })?;
        *slot = Athlete::from_fields(id, fields.clone());
        Ok(slot.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.athletes.remove(&id).is_some())
    }
}
