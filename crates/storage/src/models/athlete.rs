use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::birth_date;

/// A persisted athlete row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Athlete {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_timestamp: i64,
    pub nationality: String,
    pub discipline: String,
    pub personal_best: Option<String>,
    pub bio: Option<String>,
}

/// Every mutable athlete field, as written on create and replaced on update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthleteFields {
    pub first_name: String,
    pub last_name: String,
    pub birth_timestamp: i64,
    pub nationality: String,
    pub discipline: String,
    pub personal_best: Option<String>,
    pub bio: Option<String>,
}

impl Athlete {
    pub fn from_fields(id: i64, fields: AthleteFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            birth_timestamp: fields.birth_timestamp,
            nationality: fields.nationality,
            discipline: fields.discipline,
            personal_best: fields.personal_best,
            bio: fields.bio,
        }
    }

    pub fn birth_date(&self) -> NaiveDate {
        birth_date::to_date(self.birth_timestamp)
    }
}
