// src/extractors/fields.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Share counts at or below this are footnote indices or stray numbers.
const MIN_SHARE_COUNT: u64 = 100;

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("Failed to compile PERCENT_RE")
});

static DIGIT_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[\d,]*").expect("Failed to compile DIGIT_GROUP_RE")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub shares_owned: Option<u64>,
    /// Percentage digits as written in the filing, e.g. "4.5".
    pub ownership_percent: Option<String>,
}

/// Pulls ownership percent and share count from the cells after the name cell.
/// Each field comes from the first cell that yields it; they are independent.
pub fn extract_fields<S: AsRef<str>>(cells: &[S]) -> RowFields {
    let mut fields = RowFields::default();
    let mut percent_seen = false;

    for cell in cells {
        let text = cell.as_ref().trim();

        if !percent_seen {
            if let Some(caps) = PERCENT_RE.captures(text) {
                percent_seen = true;
                let digits = &caps[1];
                match digits.parse::<f64>() {
                    Ok(value) if (0.0..=100.0).contains(&value) => {
                        fields.ownership_percent = Some(digits.to_string());
                    }
                    _ => tracing::debug!("Ignoring out-of-range percentage '{}'", text),
                }
            }
        }

        if fields.shares_owned.is_none() {
            fields.shares_owned = parse_share_count(text);
        }
    }

    fields
}

fn parse_share_count(text: &str) -> Option<u64> {
    let without_percent = text.replace('%', "");
    let group = DIGIT_GROUP_RE.find(&without_percent)?;
    let digits: String = group.as_str().chars().filter(|c| *c != ',').collect();
    digits.parse::<u64>().ok().filter(|n| *n > MIN_SHARE_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_and_percent() {
        let fields = extract_fields(&["1,234,567 shares", "4.5%"]);
        assert_eq!(fields.shares_owned, Some(1_234_567));
        assert_eq!(fields.ownership_percent.as_deref(), Some("4.5"));
    }

    #[test]
    fn test_first_percentage_wins() {
        let fields = extract_fields(&["2,000,000", "12.3%", "9.8%"]);
        assert_eq!(fields.ownership_percent.as_deref(), Some("12.3"));
        assert_eq!(fields.shares_owned, Some(2_000_000));
    }

    #[test]
    fn test_small_numbers_are_not_shares() {
        let fields = extract_fields(&["(3)", "99", "—"]);
        assert_eq!(fields, RowFields::default());

        // A footnote index does not block a later real count.
        let fields = extract_fields(&["7", "450,000"]);
        assert_eq!(fields.shares_owned, Some(450_000));
    }

    #[test]
    fn test_percent_cell_is_not_a_share_count() {
        // "45.2%" strips to "45.2"; the leading group 45 is under the floor.
        let fields = extract_fields(&["45.2%"]);
        assert_eq!(fields.shares_owned, None);
        assert_eq!(fields.ownership_percent.as_deref(), Some("45.2"));
    }

    #[test]
    fn test_neither_field() {
        let fields = extract_fields(&["*", "", "c/o Acme"]);
        assert_eq!(fields, RowFields::default());
    }

    #[test]
    fn test_out_of_range_percent_left_unset() {
        let fields = extract_fields(&["150%", "3.0%"]);
        assert_eq!(fields.ownership_percent, None);
        assert_eq!(fields.shares_owned, Some(150));
    }
}
