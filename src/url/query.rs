use indexmap::IndexMap;
use url::Url;

/// Parses the query component of a URL into an ordered name -> value map
///
/// Names and values are percent-decoded (`+` decodes to a space). When a
/// name repeats, the last value wins but the name keeps the position of its
/// first occurrence.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscope::url::query_params;
///
/// let url = Url::parse("http://h/?a=1&b=x%20y&a=3").unwrap();
/// let params = query_params(&url);
/// assert_eq!(params.get_index(0), Some((&"a".to_string(), &"3".to_string())));
/// assert_eq!(params["b"], "x y");
/// ```
pub fn query_params(url: &Url) -> IndexMap<String, String> {
    let mut params = IndexMap::new();

    for (name, value) in url.query_pairs() {
        params.insert(name.into_owned(), value.into_owned());
    }

    params
}

/// Returns the query inputs of a URL given as a string
///
/// Unparseable URLs yield an empty map rather than an error.
pub fn link_vars(url_str: &str) -> IndexMap<String, String> {
    Url::parse(url_str)
        .map(|url| query_params(&url))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_query() {
        let url = Url::parse("http://h/page").unwrap();
        assert!(query_params(&url).is_empty());
    }

    #[test]
    fn test_simple_query() {
        let url = Url::parse("http://h/?query_var_input=query_var_val").unwrap();
        let params = query_params(&url);
        assert_eq!(params.len(), 1);
        assert_eq!(params["query_var_input"], "query_var_val");
    }

    #[test]
    fn test_percent_decoding() {
        let url = Url::parse("http://h/?q=%3Cscript%3E&n%61me=a+b").unwrap();
        let params = query_params(&url);
        assert_eq!(params["q"], "<script>");
        assert_eq!(params["name"], "a b");
    }

    #[test]
    fn test_duplicate_names_keep_last_value_first_position() {
        let url = Url::parse("http://h/?a=1&b=2&a=3").unwrap();
        let params = query_params(&url);
        let pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_name_without_value() {
        let url = Url::parse("http://h/?flag&x=").unwrap();
        let params = query_params(&url);
        assert_eq!(params["flag"], "");
        assert_eq!(params["x"], "");
    }

    #[test]
    fn test_reencode_round_trip() {
        let url = Url::parse("http://h/?a=1%202&b=%26%3D&c=").unwrap();
        let params = query_params(&url);

        let mut rebuilt = Url::parse("http://h/").unwrap();
        rebuilt.query_pairs_mut().extend_pairs(params.iter());

        assert_eq!(query_params(&rebuilt), params);
    }

    #[test]
    fn test_link_vars() {
        let vars = link_vars("http://h/?query_var_input=query_var_val");
        assert_eq!(vars["query_var_input"], "query_var_val");
        assert!(link_vars("not a url").is_empty());
    }
}
