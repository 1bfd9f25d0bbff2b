use std::borrow::Cow;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{Athlete, AthleteFields, birth_date};
use crate::query::{PageRequest, Sort};

pub const MAX_PAGE_SIZE: i64 = 100;

/// Response containing the public view of an athlete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AthleteResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "1986-08-21")]
    pub birth_date: NaiveDate,
    pub nationality: String,
    pub discipline: String,
    pub personal_best: Option<String>,
    pub bio: Option<String>,
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        let birth_date = athlete.birth_date();
        Self {
            id: athlete.id,
            first_name: athlete.first_name,
            last_name: athlete.last_name,
            birth_date,
            nationality: athlete.nationality,
            discipline: athlete.discipline,
            personal_best: athlete.personal_best,
            bio: athlete.bio,
        }
    }
}

/// Request payload for creating or fully replacing an athlete
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AthleteRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_not_blank", message = "First name is required"),
        length(max = 30, message = "First name must not exceed 30 characters")
    )]
    pub first_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_not_blank", message = "Last name is required"),
        length(max = 30, message = "Last name must not exceed 30 characters")
    )]
    pub last_name: String,

    #[schema(example = "1986-08-21")]
    #[validate(
        required(message = "Birth date is required"),
        custom(
            function = "validate_past_or_present",
            message = "Birth date must be in the past or present"
        )
    )]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_not_blank", message = "Nationality is required"),
        length(max = 50, message = "Nationality must not exceed 50 characters")
    )]
    pub nationality: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_not_blank", message = "Discipline is required"),
        length(max = 100, message = "Discipline must not exceed 100 characters")
    )]
    pub discipline: String,

    #[validate(length(max = 20, message = "Personal best must not exceed 20 characters"))]
    pub personal_best: Option<String>,

    #[validate(length(max = 1000, message = "Bio must not exceed 1000 characters"))]
    pub bio: Option<String>,
}

/// Reads a JSON `null` as an empty string so it fails the not-blank check
/// instead of the deserializer.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn validate_past_or_present(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(ValidationError::new("past_or_present"));
    }
    Ok(())
}

impl TryFrom<AthleteRequest> for AthleteFields {
    type Error = ValidationErrors;

    fn try_from(req: AthleteRequest) -> Result<Self, Self::Error> {
        req.validate()?;

        let Some(date) = req.birth_date else {
            let mut errors = ValidationErrors::new();
            errors.add(
                "birth_date",
                ValidationError::new("required")
                    .with_message(Cow::Borrowed("Birth date is required")),
            );
            return Err(errors);
        };

        Ok(Self {
            first_name: req.first_name,
            last_name: req.last_name,
            birth_timestamp: birth_date::to_timestamp(date),
            nationality: req.nationality,
            discipline: req.discipline,
            personal_best: req.personal_best,
            bio: req.bio,
        })
    }
}

/// Query parameters of the athlete listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AthleteListParams {
    /// Filter by nationality (case-insensitive partial match)
    #[param(example = "Jamaica")]
    pub nationality: Option<String>,
    /// Filter by discipline (case-insensitive partial match)
    #[param(example = "100m")]
    pub discipline: Option<String>,
    /// Search by first or last name (case-insensitive partial match)
    #[param(example = "bolt")]
    pub search: Option<String>,
    /// Page number (0-based)
    #[serde(default)]
    #[param(minimum = 0, example = 0)]
    pub page: i64,
    /// Page size (1-100)
    #[serde(default = "default_size")]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub size: i64,
    /// Sort field: id, firstName, lastName, nationality or discipline
    #[serde(default = "default_sort_by")]
    #[param(example = "lastName")]
    pub sort_by: String,
    /// Sort direction, ASC or DESC
    #[serde(default = "default_direction")]
    #[param(example = "ASC")]
    pub direction: String,
}

fn default_size() -> i64 {
    10
}

fn default_sort_by() -> String {
    "id".to_string()
}

fn default_direction() -> String {
    "ASC".to_string()
}

impl Default for AthleteListParams {
    fn default() -> Self {
        Self {
            nationality: None,
            discipline: None,
            search: None,
            page: 0,
            size: default_size(),
            sort_by: default_sort_by(),
            direction: default_direction(),
        }
    }
}

impl AthleteListParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 0 {
            return Err("page must be >= 0".to_string());
        }
        if self.size < 1 || self.size > MAX_PAGE_SIZE {
            return Err(format!("size must be between 1 and {MAX_PAGE_SIZE}"));
        }
        if self.page > i64::from(u32::MAX) {
            return Err("page is too large".to_string());
        }
        Ok(())
    }

    /// Page request with the sort normalized. Call `validate` first; values
    /// outside the accepted ranges are clamped.
    pub fn page_request(&self) -> PageRequest {
        let page = u32::try_from(self.page.max(0)).unwrap_or(u32::MAX);
        let size = self.size.clamp(1, MAX_PAGE_SIZE) as u32;
        PageRequest::new(page, size, Sort::from_params(&self.sort_by, &self.direction))
    }
}
