use std::sync::Arc;

use storage::repository::AthleteStore;

/// Store shared by every handler
pub type SharedStore = Arc<dyn AthleteStore>;
