pub mod filter;
pub mod page;
pub mod sort;

pub use filter::{AthleteFilter, AthleteFilterBuilder};
pub use page::{Page, PageRequest};
pub use sort::{Sort, SortDirection, SortField};
