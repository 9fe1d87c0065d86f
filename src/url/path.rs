use url::Url;

/// Computes the depth of a URL's path
///
/// Depth is the number of non-empty path segments: scheme, host and query
/// are ignored, and empty segments produced by consecutive separators
/// (`/a//b`) or a trailing slash do not count.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscope::url::depth;
///
/// assert_eq!(depth(&Url::parse("http://h/").unwrap()), 0);
/// assert_eq!(depth(&Url::parse("http://h/a/b//c?d=e").unwrap()), 3);
/// ```
pub fn depth(url: &Url) -> usize {
    url.path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count()
}
