//! Tests for the header multimap.

#[cfg(test)]
mod tests {
    use crate::headers::{is_token, valid_value, Error, HeaderMap};

    fn headers(pairs: &[(&str, &[&str])]) -> HeaderMap {
        HeaderMap::from_pairs(pairs.iter().map(|(name, values)| (*name, *values))).unwrap()
    }

    #[test]
    fn test_unknown_header() {
        let headers = HeaderMap::new();
        assert!(!headers.contains("test"));
        assert!(headers.get("test").is_empty());
        assert_eq!(headers.get_line("test"), "");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_single_string_becomes_one_element_list() {
        let mut headers = HeaderMap::new();
        headers.insert("test", "string").unwrap();
        assert_eq!(headers.get("test"), ["string"]);
    }

    #[test]
    fn test_header_line_joins_values() {
        let headers = headers(&[("TwoValues", &["first value", "second value"])]);
        assert_eq!(headers.get_line("twovalues"), "first value, second value");
    }

    #[test]
    fn test_header_line_of_single_value_is_unchanged() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/html; charset=utf-8").unwrap();
        assert_eq!(headers.get_line("content-type"), "text/html; charset=utf-8");
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let headers = headers(&[("X-Test", &["value"])]);
        assert!(headers.contains("X-Test"));
        assert!(headers.contains("x-test"));
        assert!(headers.contains("X-TEST"));
        assert_eq!(headers.get("x-TeSt"), ["value"]);
    }

    #[test]
    fn test_insert_replaces_case_of_existing_name() {
        let mut headers = headers(&[("testCASE", &["old value"])]);
        headers.insert("TESTcase", "new value").unwrap();
        let all: Vec<_> = headers.iter().collect();
        assert_eq!(all, vec![("TESTcase", &["new value".to_string()][..])]);
    }

    #[test]
    fn test_append_keeps_stored_case() {
        let mut headers = headers(&[("testCASE", &["first value"])]);
        headers.append("TESTcase", ["added value", "third"]).unwrap();
        assert_eq!(headers.stored_name("testcase"), Some("testCASE"));
        assert_eq!(headers.get("TESTCASE"), ["first value", "added value", "third"]);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_append_to_absent_header_inserts() {
        let mut headers = HeaderMap::new();
        headers.append("Accept", "text/html").unwrap();
        assert_eq!(headers.stored_name("accept"), Some("Accept"));
        assert_eq!(headers.get("accept"), ["text/html"]);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut headers = headers(&[("garbage", &["one", "two"]), ("useful", &["three"])]);
        assert_eq!(headers.remove("GARBAGE"), Some(vec!["one".to_string(), "two".to_string()]));
        assert!(!headers.contains("garbage"));
        assert_eq!(headers.remove("garbage"), None);
        assert_eq!(headers.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["useful"]);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut headers = headers(&[("A", &["1"]), ("B", &["2"]), ("C", &["3"])]);
        headers.append("b", "22").unwrap();
        assert_eq!(headers.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["A", "B", "C"]);
        // A replaced header moves to the end
        headers.insert("a", "11").unwrap();
        assert_eq!(headers.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["B", "C", "a"]);
    }

    #[test]
    fn test_invalid_header_names() {
        let mut headers = HeaderMap::new();
        for name in ["", "header name", "email@example", "colon:name", "tab\tname"] {
            assert!(matches!(headers.insert(name, "valid value"), Err(Error::InvalidHeaderName(_))), "{name:?}");
            assert!(matches!(headers.append(name, "valid value"), Err(Error::InvalidHeaderName(_))), "{name:?}");
        }
        assert!(headers.is_empty());
        assert!(is_token("X-Custom_Header.v1!#$%&'*+^`|~"));
    }

    #[test]
    fn test_invalid_header_values() {
        let mut headers = HeaderMap::new();
        for value in [
            "some\x7Fvalue",
            "null\0byte",
            "some\n value",
            "some\r value",
            "some\n\r value",
            "some\r\nvalue",
            "trailing\r\n",
        ] {
            assert!(matches!(headers.insert("test", value), Err(Error::InvalidHeaderValue(_))), "{value:?}");
        }
        assert!(matches!(
            headers.insert("test", vec!["valid header", "bad\nvalue"]),
            Err(Error::InvalidHeaderValue(_))
        ));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_legal_header_values() {
        for value in ["", "plain", "tab\tseparated", "folded\r\n value", "folded\r\n\tvalue", "Zażółć ÿ"] {
            assert!(valid_value(value).is_ok(), "{value:?}");
        }
    }

    #[test]
    fn test_failed_append_leaves_values_unchanged() {
        let mut headers = headers(&[("test", &["first"])]);
        assert!(headers.append("test", "bad\rvalue").is_err());
        assert_eq!(headers.get("test"), ["first"]);
    }
}
