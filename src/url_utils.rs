//! URL Utility Functions
//!
//! Href resolution and the URL pieces the pagination scorer compares:
//! host, path components, query parameters and a dated path prefix.

use url::Url;

use crate::patterns::LINK_DATE;

/// Resolve an `href` against the document URL.
///
/// Returns `None` for empty hrefs, unresolvable input, and hrefs that
/// do not name an http(s) resource.
#[must_use]
pub fn resolve_href(href: &str, base: Option<&Url>) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Host and explicit port, the way `location.host` reports it.
#[must_use]
pub fn host_with_port(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Query string including the leading `?`, empty when there is none.
#[must_use]
pub fn search(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("?{query}"),
        _ => String::new(),
    }
}

/// Query parameters in order of first appearance. A key without `=` maps to
/// `None`; a repeated key keeps its last value.
#[must_use]
pub fn parameters_from_search(search: &str) -> Vec<(String, Option<String>)> {
    let mut parameters: Vec<(String, Option<String>)> = Vec::new();
    let query = search.strip_prefix('?').unwrap_or(search);
    if query.is_empty() {
        return parameters;
    }

    for parameter in query.split('&') {
        let (key, value) = match parameter.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (parameter.to_string(), None),
        };
        match parameters.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => parameters.push((key, value)),
        }
    }
    parameters
}

/// Split a path into components, dropping the leading slash.
///
/// A trailing empty component (path ending in `/`) is removed and reported.
#[must_use]
pub fn path_components(path: &str) -> (Vec<&str>, bool) {
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut components: Vec<&str> = path.split('/').collect();
    let ends_with_slash = components.last().is_some_and(|c| c.is_empty());
    if ends_with_slash {
        components.pop();
    }
    (components, ends_with_slash)
}

/// The part of `path` up to and including an embedded date.
///
/// `/2015/03/12/story` yields `/2015/03/12/`.
#[must_use]
pub fn date_prefix(path: &str) -> Option<String> {
    let found = LINK_DATE.find(path)?;
    Some(path[..found.end()].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/news/story-2?ref=home").unwrap()
    }

    #[test]
    fn test_resolve_href() {
        let url = resolve_href("story-3", Some(&base())).unwrap();
        assert_eq!(url.as_str(), "https://example.com/news/story-3");

        let absolute = resolve_href("http://other.org/x", Some(&base())).unwrap();
        assert_eq!(absolute.host_str(), Some("other.org"));

        assert!(resolve_href("", Some(&base())).is_none());
        assert!(resolve_href("javascript:void(0)", Some(&base())).is_none());
        assert!(resolve_href("mailto:a@b.c", Some(&base())).is_none());
        assert!(resolve_href("/relative", None).is_none());
    }

    #[test]
    fn test_host_and_search() {
        let url = Url::parse("http://example.com:8080/a?x=1").unwrap();
        assert_eq!(host_with_port(&url), "example.com:8080");
        assert_eq!(search(&url), "?x=1");
        assert_eq!(search(&Url::parse("http://example.com/a?").unwrap()), "");
    }

    #[test]
    fn test_parameters_from_search() {
        let params = parameters_from_search("?page=2&flag&page=3&q=");
        assert_eq!(
            params,
            vec![
                ("page".to_string(), Some("3".to_string())),
                ("flag".to_string(), None),
                ("q".to_string(), Some(String::new())),
            ]
        );
        assert!(parameters_from_search("").is_empty());
    }

    #[test]
    fn test_path_components() {
        assert_eq!(path_components("/news/story-2"), (vec!["news", "story-2"], false));
        assert_eq!(path_components("/news/"), (vec!["news"], true));
        assert_eq!(path_components("/"), (Vec::<&str>::new(), true));
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("/2015/03/12/story").as_deref(), Some("/2015/03/12/"));
        assert_eq!(date_prefix("/blog/2015-03-12/story").as_deref(), Some("/blog/2015-03-12/"));
        assert!(date_prefix("/news/story-2").is_none());
    }
}
