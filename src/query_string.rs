use std::collections::HashMap;

#[derive(PartialEq, Debug, Default, Clone)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn from_opt(buf: Option<&str>) -> Self {
        buf.map(Self::from).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// Re-encodes only the given keys, in the given order. Empty when none is present.
    pub fn forward(&self, keys: &[&str]) -> String {
        let pairs: Vec<(&str, &str)> = keys.iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect();
        if pairs.is_empty() {
            return String::new();
        }
        match serde_urlencoded::to_string(pairs) {
            Ok(encoded) => format!("?{}", encoded),
            Err(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_str() {
        let buf = "width=800&height=abc&title=caf%C3%A9";
        let qs = QueryString::from(buf);
        assert_eq!(qs.get("width"), Some("800"));
        assert_eq!(qs.get("height"), Some("abc"));
        assert_eq!(qs.get("title"), Some("café"));
        assert_eq!(qs.get("missing"), None);
    }

    #[test]
    fn test_parse_invalid_query_str() {
        let expected = QueryString {
            items: Default::default(),
        };
        assert_eq!(QueryString::from(""), expected);
        assert_eq!(QueryString::from_opt(None), expected);
    }

    #[test]
    fn test_parse_key_only_query_str() {
        let qs = QueryString::from("key-only");
        assert_eq!(qs.get("key-only"), Some(""));
    }

    #[test]
    fn test_forward() {
        let qs = QueryString::from("height=400&foo=bar&width=800");
        assert_eq!(qs.forward(&["width", "height"]), "?width=800&height=400");
        assert_eq!(QueryString::from("foo=bar").forward(&["width"]), "");
    }
}
