pub mod athlete;
pub mod birth_date;

pub use athlete::{Athlete, AthleteFields};
