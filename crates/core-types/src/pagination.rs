use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// A window into a paginated resource. Both fields are always at least 1, so the derived
/// offset is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::InvalidInput(
                "page".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if limit == 0 {
            return Err(CoreError::InvalidInput(
                "limit".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, limit })
    }

    /// Parses string-encoded form fields.
    ///
    /// Missing, empty, non-numeric and zero values fall back to page 1 and `default_limit`
    /// silently. Negative values are rejected.
    pub fn parse_lenient(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, CoreError> {
        let page = lenient_field("page", page, DEFAULT_PAGE)?;
        let limit = lenient_field("limit", limit, default_limit)?;
        Self::new(page, limit)
    }

    /// The same window size, pointed at another page.
    pub fn with_page(self, page: u32) -> Result<Self, CoreError> {
        Self::new(page, self.limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn lenient_field(name: &str, raw: Option<&str>, default: u32) -> Result<u32, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(0) | Err(_) => Ok(default),
        Ok(value) if value < 0 => Err(CoreError::InvalidInput(
            name.to_string(),
            format!("must be a positive integer, got {value}"),
        )),
        Ok(value) => u32::try_from(value).map_err(|_| {
            CoreError::InvalidInput(name.to_string(), format!("{value} is too large"))
        }),
    }
}

/// One page of rows together with the size of the whole resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub rows: Vec<T>,
    pub total_count: i64,
}

impl<T> PagedResult<T> {
    pub fn new(rows: Vec<T>, total_count: i64) -> Self {
        Self { rows, total_count }
    }

    /// Number of pages needed to show `total_count` rows, `limit` at a time.
    pub fn total_pages(&self, limit: u32) -> u64 {
        if self.total_count <= 0 || limit == 0 {
            return 0;
        }
        (self.total_count as u64).div_ceil(u64::from(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    fn offset_is_derived_from_page_and_limit(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        assert_eq!(PageRequest::new(page, limit).unwrap().offset(), offset);
    }

    #[rstest]
    #[case(Some("abc"), Some("10"), 1, 10)]
    #[case(None, None, 1, 10)]
    #[case(Some(""), Some("  "), 1, 10)]
    #[case(Some("0"), Some("0"), 1, 10)]
    #[case(Some("3"), Some("25"), 3, 25)]
    #[case(Some(" 2 "), Some("x"), 2, 10)]
    fn lenient_parsing_falls_back_to_defaults(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::parse_lenient(page, limit, DEFAULT_LIMIT).unwrap();
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[test]
    fn non_numeric_page_yields_offset_zero() {
        let request = PageRequest::parse_lenient(Some("abc"), None, DEFAULT_LIMIT).unwrap();
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(Some("-1"), None)]
    #[case(None, Some("-10"))]
    fn negative_values_are_rejected(#[case] page: Option<&str>, #[case] limit: Option<&str>) {
        assert!(matches!(
            PageRequest::parse_lenient(page, limit, DEFAULT_LIMIT),
            Err(CoreError::InvalidInput(_, _))
        ));
    }

    #[test]
    fn zero_is_not_a_valid_page() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }

    #[rstest]
    #[case(25, 10, 3)]
    #[case(20, 10, 2)]
    #[case(1, 10, 1)]
    #[case(0, 10, 0)]
    fn total_pages_rounds_up(#[case] total: i64, #[case] limit: u32, #[case] pages: u64) {
        let result: PagedResult<()> = PagedResult::new(Vec::new(), total);
        assert_eq!(result.total_pages(limit), pages);
    }

    #[test]
    fn paged_result_uses_camel_case_on_the_wire() {
        let result = PagedResult::new(vec!["a"], 1);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "rows": ["a"], "totalCount": 1 }));
    }
}
