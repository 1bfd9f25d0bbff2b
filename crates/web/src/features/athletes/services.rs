use storage::{
    dto::athlete::AthleteListParams,
    error::{Result, StorageError},
    models::{Athlete, AthleteFields},
    query::{AthleteFilter, Page},
    repository::AthleteStore,
};

/// List athletes matching the optional filters, one page at a time.
///
/// Paging bounds are checked by the caller; the sort is normalized here.
pub async fn list_athletes(
    store: &dyn AthleteStore,
    params: &AthleteListParams,
) -> Result<Page<Athlete>> {
    let filter = AthleteFilter::builder()
        .nationality(params.nationality.as_deref())
        .discipline(params.discipline.as_deref())
        .search(params.search.as_deref())
        .build();
    let request = params.page_request();

    tracing::debug!(
        "Fetching athletes with filters and pagination: page={}, size={}",
        request.page,
        request.size
    );
    let page = store.find_page(&filter, &request).await?;
    tracing::info!(
        "Retrieved {} athletes matching filters (page {} of {})",
        page.content.len(),
        u64::from(request.page) + 1,
        page.total_pages()
    );

    Ok(page)
}

/// List every athlete without paging
pub async fn list_all_athletes(store: &dyn AthleteStore) -> Result<Vec<Athlete>> {
    tracing::debug!("Fetching all athletes");
    let athletes = store.find_all().await?;
    tracing::info!("Retrieved {} athletes", athletes.len());
    Ok(athletes)
}

pub async fn get_athlete(store: &dyn AthleteStore, id: i64) -> Result<Athlete> {
    tracing::debug!("Fetching athlete with id: {}", id);
    match store.find_by_id(id).await? {
        Some(athlete) => {
            tracing::info!(
                "Found athlete: id={}, name={} {}",
                id,
                athlete.first_name,
                athlete.last_name
            );
            Ok(athlete)
        }
        None => {
            tracing::warn!("Athlete not found with id: {}", id);
            Err(StorageError::NotFound { id })
        }
    }
}

/// Create an athlete, rejecting a second athlete with the same first name,
/// last name and birth date
pub async fn create_athlete(store: &dyn AthleteStore, fields: AthleteFields) -> Result<Athlete> {
    tracing::debug!(
        "Creating new athlete: {} {}",
        fields.first_name,
        fields.last_name
    );

    if store
        .exists_by_identity(&fields.first_name, &fields.last_name, fields.birth_timestamp)
        .await?
    {
        tracing::warn!(
            "Attempted to create duplicate athlete: {} {}",
            fields.first_name,
            fields.last_name
        );
        return Err(StorageError::Duplicate {
            first_name: fields.first_name,
            last_name: fields.last_name,
        });
    }

    let created = store.insert(&fields).await?;
    tracing::info!(
        "Created new athlete: id={}, name={} {}",
        created.id,
        created.first_name,
        created.last_name
    );

    Ok(created)
}

/// Replace every mutable field of an existing athlete.
///
/// Uniqueness is only enforced on create, so an update may collide with
/// another athlete's name and birth date.
pub async fn update_athlete(
    store: &dyn AthleteStore,
    id: i64,
    fields: AthleteFields,
) -> Result<Athlete> {
    let existing = get_athlete(store, id).await?;
    tracing::debug!("Updating athlete with id: {}", existing.id);

    let updated = store.update(existing.id, &fields).await?;
    tracing::info!(
        "Updated athlete: id={}, name={} {}",
        updated.id,
        updated.first_name,
        updated.last_name
    );

    Ok(updated)
}

/// Delete an athlete. Deleting an unknown id is a no-op.
pub async fn delete_athlete(store: &dyn AthleteStore, id: i64) -> Result<()> {
    tracing::debug!("Attempting to delete athlete with id: {}", id);
    if store.delete_by_id(id).await? {
        tracing::info!("Deleted athlete with id: {}", id);
    } else {
        tracing::warn!("Attempted to delete non-existent athlete with id: {}", id);
    }
    Ok(())
}
