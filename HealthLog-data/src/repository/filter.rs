/// Query options for listing a user's log entries.
///
/// Bounds are inclusive and compared against the stored timestamp text, which
/// is always normalized UTC RFC 3339 so lexical order equals time order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Earliest timestamp to include
    pub start: Option<String>,
    /// Latest timestamp to include
    pub end: Option<String>,
    /// Maximum number of records to return
    pub limit: Option<usize>,
    /// Number of records to skip
    pub offset: Option<usize>,
    /// Newest first when true or unset
    pub sort_desc: Option<bool>,
}

impl EntryFilter {
    /// Whether a timestamp falls inside the bounds
    pub fn contains(&self, timestamp: &str) -> bool {
        if let Some(start) = &self.start {
            if timestamp < start.as_str() {
                return false;
            }
        }

        if let Some(end) = &self.end {
            if timestamp > end.as_str() {
                return false;
            }
        }

        true
    }

    pub fn is_descending(&self) -> bool {
        self.sort_desc.unwrap_or(true)
    }

    /// Sort by timestamp and cut one page out of already filtered records.
    /// Returns the page and the number of records before pagination.
    pub fn paginate<T, F>(&self, mut records: Vec<T>, timestamp: F) -> (Vec<T>, usize)
    where
        F: Fn(&T) -> String,
    {
        let descending = self.is_descending();
        records.sort_by(|a, b| {
            let cmp = timestamp(a).cmp(&timestamp(b));
            if descending {
                cmp.reverse()
            } else {
                cmp
            }
        });

        let total = records.len();
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(total);

        let page = records.into_iter().skip(offset).take(limit).collect();
        (page, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let filter = EntryFilter {
            start: Some("2024-01-01T00:00:00.000Z".to_string()),
            end: Some("2024-01-31T23:59:59.999Z".to_string()),
            ..Default::default()
        };

        assert!(filter.contains("2024-01-01T00:00:00.000Z"));
        assert!(filter.contains("2024-01-15T12:00:00.000Z"));
        assert!(filter.contains("2024-01-31T23:59:59.999Z"));
        assert!(!filter.contains("2023-12-31T23:59:59.999Z"));
        assert!(!filter.contains("2024-02-01T00:00:00.000Z"));
    }

    #[test]
    fn test_paginate_sorts_and_counts() {
        let filter = EntryFilter {
            limit: Some(2),
            offset: Some(1),
            sort_desc: Some(false),
            ..Default::default()
        };

        let records = vec!["c", "a", "d", "b"];
        let (page, total) = filter.paginate(records, |r| r.to_string());

        assert_eq!(total, 4);
        assert_eq!(page, vec!["b", "c"]);
    }

    #[test]
    fn test_paginate_defaults_to_newest_first() {
        let (page, _) = EntryFilter::default().paginate(vec!["a", "c", "b"], |r| r.to_string());
        assert_eq!(page, vec!["c", "b", "a"]);
    }
}
