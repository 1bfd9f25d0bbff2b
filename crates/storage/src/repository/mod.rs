//! Athlete persistence behind a store-agnostic capability trait.

pub mod athlete;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Athlete, AthleteFields};
use crate::query::{AthleteFilter, Page, PageRequest};

pub use athlete::AthleteRepository;
pub use memory::InMemoryAthleteStore;

/// Storage capabilities the athlete services rely on
#[async_trait]
pub trait AthleteStore: Send + Sync {
    /// Page of athletes matching `filter`, ordered by the request's sort
    async fn find_page(
        &self,
        filter: &AthleteFilter,
        request: &PageRequest,
    ) -> Result<Page<Athlete>>;

    /// Every athlete, in ascending id order
    async fn find_all(&self) -> Result<Vec<Athlete>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Athlete>>;

    /// Whether an athlete with exactly this name and birth timestamp exists
    async fn exists_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        birth_timestamp: i64,
    ) -> Result<bool>;

    /// Persists a new athlete and returns it with its assigned id
    async fn insert(&self, fields: &AthleteFields) -> Result<Athlete>;

    /// Replaces every mutable field of an athlete. Fails with `NotFound` if absent.
    async fn update(&self, id: i64, fields: &AthleteFields) -> Result<Athlete>;

    /// Removes an athlete. Returns whether it existed.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;
}
