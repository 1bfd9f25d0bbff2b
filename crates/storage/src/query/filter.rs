//! Composable athlete predicates built from optional user criteria.
//!
//! A filter is an ordered list of active criteria folded with logical AND.
//! Blank or missing criteria never become part of the list, so a filter built
//! from nothing matches every athlete.

use sqlx::{Postgres, QueryBuilder};

use crate::models::Athlete;

/// A single active criterion. Terms are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Criterion {
    NationalityContains(String),
    DisciplineContains(String),
    NameContains(String),
}

impl Criterion {
    fn matches(&self, athlete: &Athlete) -> bool {
        match self {
            Self::NationalityContains(term) => contains_ignore_case(&athlete.nationality, term),
            Self::DisciplineContains(term) => contains_ignore_case(&athlete.discipline, term),
            Self::NameContains(term) => {
                contains_ignore_case(&athlete.first_name, term)
                    || contains_ignore_case(&athlete.last_name, term)
            }
        }
    }

    fn push_sql(&self, query: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::NationalityContains(term) => push_contains(query, "nationality", term),
            Self::DisciplineContains(term) => push_contains(query, "discipline", term),
            Self::NameContains(term) => {
                query.push("(");
                push_contains(query, "first_name", term);
                query.push(" OR ");
                push_contains(query, "last_name", term);
                query.push(")");
            }
        }
    }
}

fn contains_ignore_case(value: &str, lowered_term: &str) -> bool {
    value.to_lowercase().contains(lowered_term)
}

// strpos matches the term literally, so `%` and `_` carry no pattern meaning.
fn push_contains(query: &mut QueryBuilder<'_, Postgres>, column: &str, lowered_term: &str) {
    query.push("strpos(lower(");
    query.push(column);
    query.push("), ");
    query.push_bind(lowered_term.to_string());
    query.push(") > 0");
}

/// AND-combined predicate over athletes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AthleteFilter {
    criteria: Vec<Criterion>,
}

impl AthleteFilter {
    pub fn builder() -> AthleteFilterBuilder {
        AthleteFilterBuilder::default()
    }

    pub fn matches(&self, athlete: &Athlete) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(athlete))
    }

    /// Appends ` AND <criterion>` for every active criterion.
    ///
    /// The builder must already contain a `WHERE` clause.
    pub fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        for criterion in &self.criteria {
            query.push(" AND ");
            criterion.push_sql(query);
        }
    }
}

#[derive(Debug, Default)]
pub struct AthleteFilterBuilder {
    criteria: Vec<Criterion>,
}

impl AthleteFilterBuilder {
    /// Case-insensitive substring match on nationality
    pub fn nationality(self, nationality: Option<&str>) -> Self {
        self.with(nationality, Criterion::NationalityContains)
    }

    /// Case-insensitive substring match on discipline
    pub fn discipline(self, discipline: Option<&str>) -> Self {
        self.with(discipline, Criterion::DisciplineContains)
    }

    /// Case-insensitive substring match on first name OR last name
    pub fn search(self, term: Option<&str>) -> Self {
        self.with(term, Criterion::NameContains)
    }

    pub fn build(self) -> AthleteFilter {
        AthleteFilter {
            criteria: self.criteria,
        }
    }

    fn with(mut self, value: Option<&str>, criterion: fn(String) -> Criterion) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.criteria.push(criterion(value.to_lowercase()));
        }
        self
    }
}
