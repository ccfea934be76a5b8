use chrono::NaiveDate;

use crate::{
    catalog::Catalog,
    destination::Destination,
    error::{Error, Result},
    months::Month,
};

/// The month of a `YYYY-MM-DD` date, or of today (local time) when absent.
pub fn travel_month(date: Option<&str>) -> Result<Month> {
    let date = match date {
        Some(input) => NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate {
                input: input.to_string(),
            })?,
        None => chrono::Local::now().date_naive(),
    };
    Ok(Month::of_date(date))
}

/// What the user narrowed the catalog down to.
///
/// Empty `categories` or `regions` mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    pub month: Month,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
}

impl Criteria {
    pub fn for_month(month: Month) -> Self {
        Self {
            month,
            categories: Vec::new(),
            regions: Vec::new(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    /// Whether a single destination passes every active filter.
    pub fn matches(&self, dest: &Destination) -> bool {
        dest.months.contains(self.month)
            && (self.categories.is_empty()
                || dest
                    .category
                    .as_deref()
                    .is_some_and(|c| contains(&self.categories, c)))
            && (self.regions.is_empty()
                || contains(&self.regions, &dest.state))
    }
}

fn contains(allowed: &[String], value: &str) -> bool {
    let value = value.trim();
    allowed.iter().any(|a| a == value)
}

/// Destinations that pass `criteria`, in catalog order.
pub fn apply<'a>(catalog: &'a Catalog, criteria: &Criteria) -> Vec<&'a Destination> {
    catalog
        .destinations()
        .iter()
        .filter(|d| criteria.matches(d))
        .collect()
}
