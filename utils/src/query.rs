use multimap::MultiMap;
use url::{form_urlencoded, Url};

/// Query string parameters, possibly repeated
#[derive(Debug, Clone)]
pub struct QueryParams {
    params: MultiMap<String, String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParams {
    pub fn new() -> Self {
        Self {
            params: MultiMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// Add the parameter only when a value is present
    pub fn with_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn push(&mut self, name: &str, value: impl ToString) {
        self.params.insert(name.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// All pairs sorted by name then value, so equal parameter sets render
    /// the same whatever order they were added in
    pub fn canonical_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .params
            .iter_all()
            .flat_map(|(name, values)| {
                values
                    .iter()
                    .map(move |value| (name.as_str(), value.as_str()))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// Url-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.canonical_pairs() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }

    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (name, value) in self.canonical_pairs() {
            query.append_pair(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_ignores_insertion_order() {
        let first = QueryParams::new()
            .with("walletId", 7)
            .with("search", "rent")
            .with("categoryId", 3)
            .with("categoryId", 1);
        let second = QueryParams::new()
            .with("categoryId", 1)
            .with("search", "rent")
            .with("categoryId", 3)
            .with("walletId", 7);

        assert_eq!(first.to_query_string(), second.to_query_string());
        assert_eq!(
            first.to_query_string(),
            "categoryId=1&categoryId=3&search=rent&walletId=7"
        );
    }

    #[test]
    fn test_optional_values_are_skipped() {
        let params = QueryParams::new()
            .with_opt("from", Some("2024-01-01"))
            .with_opt::<&str>("to", None);

        assert_eq!(params.to_query_string(), "from=2024-01-01");
    }

    #[test]
    fn test_apply_to_encodes_values() {
        let mut url = Url::parse("https://api.cashly.test/transactions").unwrap();
        QueryParams::new()
            .with("search", "coffee & cake")
            .apply_to(&mut url);

        assert_eq!(
            url.as_str(),
            "https://api.cashly.test/transactions?search=coffee+%26+cake"
        );
    }

    #[test]
    fn test_empty_params_leave_url_untouched() {
        let mut url = Url::parse("https://api.cashly.test/wallets").unwrap();
        QueryParams::new().apply_to(&mut url);

        assert!(QueryParams::default().is_empty());
        assert_eq!(url.as_str(), "https://api.cashly.test/wallets");
    }
}
