use url::Url;

/// Returns the lowercase hostname of `url` if it is a page on one of
/// `web_schemes`. Internal pages (`chrome://`, `about:`, extension pages) and
/// unparseable input yield `None`.
pub fn web_host<S: AsRef<str>>(url: &str, web_schemes: &[S]) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !web_schemes.iter().any(|s| s.as_ref().eq_ignore_ascii_case(parsed.scheme())) {
        return None;
    }
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEB: [&str; 2] = ["http", "https"];

    #[test]
    fn web_pages_yield_their_host() {
        assert_eq!(web_host("https://Example.com/a?b", &WEB).as_deref(), Some("example.com"));
        assert_eq!(web_host("http://www.x.com:8080/", &WEB).as_deref(), Some("www.x.com"));
    }

    #[test]
    fn internal_and_invalid_urls_are_ignored() {
        assert_eq!(web_host("chrome://newtab", &WEB), None);
        assert_eq!(web_host("chrome-extension://abc/popup.html", &WEB), None);
        assert_eq!(web_host("about:blank", &WEB), None);
        assert_eq!(web_host("not a url", &WEB), None);
        assert_eq!(web_host("file:///etc/hosts", &WEB), None);
    }

    #[test]
    fn schemes_are_configurable() {
        assert_eq!(web_host("http://x.com/", &["https"]), None);
        assert_eq!(web_host("https://x.com/", &["https"]).as_deref(), Some("x.com"));
    }
}
