use std::cmp::Ordering;

use crate::models::Athlete;

/// Columns an athlete listing may be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    LastName,
    Nationality,
    Discipline,
}

impl SortField {
    /// Resolves an API sort key, falling back to `id` for anything outside the
    /// allow-list. Matching is exact.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "id" => Self::Id,
            "firstName" => Self::FirstName,
            "lastName" => Self::LastName,
            "nationality" => Self::Nationality,
            "discipline" => Self::Discipline,
            _ => Self::default(),
        }
    }

    pub fn as_column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Nationality => "nationality",
            Self::Discipline => "discipline",
        }
    }

    fn compare(&self, a: &Athlete, b: &Athlete) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::FirstName => a.first_name.cmp(&b.first_name),
            Self::LastName => a.last_name.cmp(&b.last_name),
            Self::Nationality => a.nationality.cmp(&b.nationality),
            Self::Discipline => a.discipline.cmp(&b.discipline),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `DESC` in any case selects descending order; every other value is
    /// ascending.
    pub fn parse_or_default(value: &str) -> Self {
        if value.eq_ignore_ascii_case("DESC") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Builds a sort from raw query values, never failing.
    pub fn from_params(sort_by: &str, direction: &str) -> Self {
        Self::new(
            SortField::parse_or_default(sort_by),
            SortDirection::parse_or_default(direction),
        )
    }

    /// Ordering of two athletes under this sort. Ties fall back to ascending id.
    pub fn compare(&self, a: &Athlete, b: &Athlete) -> Ordering {
        let ordering = self.field.compare(a, b);
        let ordering = match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }

    /// `ORDER BY` clause body, e.g. `last_name DESC, id ASC`
    pub fn to_sql(&self) -> String {
        match self.field {
            SortField::Id => format!("id {}", self.direction.as_sql()),
            field => format!("{} {}, id ASC", field.as_column(), self.direction.as_sql()),
        }
    }
}
