//! Expansion of human-entered "best months to visit" strings.
//!
//! Catalog rows describe seasons loosely: `"Oct-Mar"`, `"Jan, Mar–Apr"`,
//! `"Nov—Feb, Jun"`. [`expand`] turns such a string into the [`MonthSet`] it
//! denotes so the filter can answer "is this place worth visiting in
//! January?" with a single membership test.

use std::fmt;

use chrono::Datelike;
use serde::{Serialize, Serializer};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Three-letter abbreviation, e.g. `"Jan"`.
    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Zero-based position in the calendar (`Jan` is 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a month by its exact three-letter abbreviation.
    ///
    /// Matching is case-sensitive, the same way catalog data spells them.
    pub fn from_abbrev(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.abbrev() == s)
    }

    /// The month a calendar date falls in.
    pub fn of_date(date: impl Datelike) -> Self {
        // month0() is always in 0..12
        Self::ALL[date.month0() as usize]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.abbrev())
    }
}

/// A set of calendar months stored as a 12-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MonthSet(u16);

impl MonthSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, month: Month) {
        self.0 |= 1 << month.index();
    }

    pub fn contains(&self, month: Month) -> bool {
        self.0 & (1 << month.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterate the members in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = Month> + '_ {
        Month::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Month> for MonthSet {
    fn from_iter<I: IntoIterator<Item = Month>>(iter: I) -> Self {
        let mut set = Self::empty();
        for month in iter {
            set.insert(month);
        }
        set
    }
}

impl fmt::Display for MonthSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Month::abbrev).collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for MonthSet {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Outcome of expanding a months string.
///
/// Malformed parts never fail the expansion; they are collected in
/// `skipped` so callers can see that the result is partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub months: MonthSet,
    pub skipped: Vec<String>,
}

impl Expansion {
    /// True when at least one non-empty part could not be understood.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Expand a "best months" string into the months it denotes.
///
/// Parts are separated by commas. Each part is either a single month
/// abbreviation or a `Start-End` range; en-dash and em-dash count as
/// hyphens. A range whose start comes after its end wraps around the year.
///
/// ```
/// use wanderlist::months::{Month, expand};
///
/// let winter = expand(Some("Oct-Mar"));
/// assert!(winter.months.contains(Month::Dec));
/// assert!(winter.months.contains(Month::Jan));
/// assert!(!winter.months.contains(Month::Jun));
/// assert_eq!(winter.months.len(), 6);
/// ```
pub fn expand(raw: Option<&str>) -> Expansion {
    let mut expansion = Expansion::default();
    let Some(raw) = raw else {
        return expansion;
    };

    let normalized = raw.replace(['\u{2013}', '\u{2014}'], "-");
    for part in normalized.split(',').map(str::trim) {
        if part.is_empty() {
            continue;
        }
        match expand_part(part) {
            Some(months) => {
                expansion.months = expansion.months.union(months);
            }
            None => expansion.skipped.push(part.to_string()),
        }
    }

    expansion
}

/// Shorthand for [`expand`] when only the months matter.
pub fn expand_months(raw: Option<&str>) -> MonthSet {
    expand(raw).months
}

fn expand_part(part: &str) -> Option<MonthSet> {
    let Some((start, end)) = part.split_once('-') else {
        return Month::from_abbrev(part).map(|m| MonthSet::from_iter([m]));
    };
    if end.contains('-') {
        return None;
    }

    // No trimming inside a range: "Oct - Dec" is not understood.
    let start = Month::from_abbrev(start)?.index();
    let end = Month::from_abbrev(end)?.index();

    let months = if start <= end {
        Month::ALL[start..=end].iter().copied().collect()
    } else {
        Month::ALL[start..]
            .iter()
            .chain(&Month::ALL[..=end])
            .copied()
            .collect()
    };
    Some(months)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use super::Month::*;

    fn set(months: &[Month]) -> MonthSet {
        months.iter().copied().collect()
    }

    #[test]
    fn wrapping_range() {
        assert_eq!(
            expand_months(Some("Oct-Mar")),
            set(&[Oct, Nov, Dec, Jan, Feb, Mar])
        );
    }

    #[test]
    fn forward_range() {
        assert_eq!(expand_months(Some("Jan-Mar")), set(&[Jan, Feb, Mar]));
    }

    #[test]
    fn empty_and_missing_input() {
        assert!(expand_months(Some("")).is_empty());
        assert!(expand_months(None).is_empty());
        assert!(!expand(Some("   ")).is_partial());
    }

    #[test]
    fn single_and_range_mixed() {
        assert_eq!(
            expand_months(Some("Jan, Mar-Apr")),
            set(&[Jan, Mar, Apr])
        );
    }

    #[test]
    fn malformed_range_is_dropped() {
        let only_bad = expand(Some("Xyz-Mar"));
        assert!(only_bad.months.is_empty());
        assert_eq!(only_bad.skipped, vec!["Xyz-Mar".to_string()]);

        let mixed = expand(Some("Jan, Xyz-Mar"));
        assert_eq!(mixed.months, set(&[Jan]));
        assert!(mixed.is_partial());
    }

    #[test]
    fn dashes_are_normalized() {
        assert_eq!(expand_months(Some("Nov\u{2013}Feb")), set(&[Nov, Dec, Jan, Feb]));
        assert_eq!(expand_months(Some("Apr\u{2014}Jun")), set(&[Apr, May, Jun]));
    }

    #[test]
    fn spaces_around_hyphen_are_skipped() {
        let e = expand(Some("Oct - Dec, Jun"));
        assert_eq!(e.months, set(&[Jun]));
        assert_eq!(e.skipped, vec!["Oct - Dec".to_string()]);
        assert!(expand_months(Some("Oct -Mar")).is_empty());
    }

    #[test]
    fn single_month_range() {
        assert_eq!(expand_months(Some("May-May")), set(&[May]));
    }

    #[test]
    fn double_hyphen_is_skipped() {
        let e = expand(Some("Jan-Feb-Mar, Jul"));
        assert_eq!(e.months, set(&[Jul]));
        assert_eq!(e.skipped, vec!["Jan-Feb-Mar".to_string()]);
    }

    #[test]
    fn full_month_names_are_not_recognized() {
        let e = expand(Some("January, Feb"));
        assert_eq!(e.months, set(&[Feb]));
        assert_eq!(e.skipped, vec!["January".to_string()]);
    }

    #[test]
    fn overlapping_parts_union() {
        let months = expand_months(Some("Jan-Mar, Feb, Mar-Apr"));
        assert_eq!(months, set(&[Jan, Feb, Mar, Apr]));
        assert_eq!(months.len(), 4);
    }

    #[test]
    fn expansion_is_deterministic() {
        for raw in ["Oct-Mar", "Jan, Mar-Apr", "Jan, Xyz-Mar", ""] {
            assert_eq!(expand(Some(raw)), expand(Some(raw)));
        }
    }

    #[test]
    fn month_of_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(Month::of_date(date), Jan);
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(Month::of_date(date), Dec);
    }

    #[test]
    fn set_iterates_in_calendar_order() {
        let months = expand_months(Some("Nov-Feb"));
        let order: Vec<Month> = months.iter().collect();
        assert_eq!(order, vec![Jan, Feb, Nov, Dec]);
        assert_eq!(months.to_string(), "Jan, Feb, Nov, Dec");
    }

    #[test]
    fn set_serializes_as_abbreviations() {
        let json = serde_json::to_string(&set(&[Mar, Jan])).unwrap();
        assert_eq!(json, r#"["Jan","Mar"]"#);
    }
}
