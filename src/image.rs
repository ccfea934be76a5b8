use serde::Serialize;

/// Whether a destination's image reference can be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImageStatus {
    Available { url: String },
    Unavailable { reason: String },
}

impl ImageStatus {
    /// Check an image reference without fetching it.
    ///
    /// Only absolute `http`/`https` URLs with a host are accepted.
    pub fn check(reference: &str) -> Self {
        match validate(reference.trim()) {
            Ok(()) => ImageStatus::Available {
                url: reference.trim().to_string(),
            },
            Err(reason) => {
                tracing::debug!(reference, reason, "image unavailable");
                ImageStatus::Unavailable {
                    reason: reason.to_string(),
                }
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageStatus::Available { url } => Some(url),
            ImageStatus::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.url().is_some()
    }
}

/// Text shown in place of an image that cannot be displayed.
pub fn placeholder(name: &str) -> String {
    format!("Image not available for {name}")
}

fn validate(reference: &str) -> Result<(), &'static str> {
    if reference.is_empty() {
        return Err("no image reference");
    }
    if reference.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("reference contains whitespace");
    }

    let (scheme, rest) = reference
        .split_once("://")
        .ok_or("reference is not an absolute URL")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err("unsupported URL scheme");
    }

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    // Bracketed IPv6 literals contain colons of their own.
    let (host, port) = match host_port.strip_prefix('[') {
        Some(v6) => match v6.split_once(']') {
            Some((addr, tail)) => (addr, tail.strip_prefix(':')),
            None => return Err("unterminated IPv6 host"),
        },
        None => match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        },
    };
    if port.is_some_and(|p| !p.chars().all(|c| c.is_ascii_digit())) {
        return Err("invalid port");
    }
    if host.is_empty() {
        return Err("URL has no host");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(reference: &str) -> String {
        match ImageStatus::check(reference) {
            ImageStatus::Unavailable { reason } => reason,
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn accepts_http_and_https() {
        for url in [
            "https://example.com/hampi.jpg",
            "http://img.example.org:8080/a/b.png?size=large",
            "HTTPS://Example.com",
        ] {
            let status = ImageStatus::check(url);
            assert_eq!(status.url(), Some(url));
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let status = ImageStatus::check("  https://example.com/x.jpg ");
        assert_eq!(status.url(), Some("https://example.com/x.jpg"));
    }

    #[test]
    fn rejects_missing_and_malformed() {
        assert_eq!(reason(""), "no image reference");
        assert_eq!(reason("hampi.jpg"), "reference is not an absolute URL");
        assert_eq!(reason("ftp://example.com/x.jpg"), "unsupported URL scheme");
        assert_eq!(reason("https:///x.jpg"), "URL has no host");
        assert_eq!(
            reason("https://example.com/my image.jpg"),
            "reference contains whitespace"
        );
        assert_eq!(reason("https://example.com:abc/x.jpg"), "invalid port");
    }

    #[test]
    fn placeholder_names_the_destination() {
        assert_eq!(placeholder("Hampi"), "Image not available for Hampi");
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_string(&ImageStatus::check("nope")).unwrap();
        assert_eq!(
            json,
            r#"{"status":"unavailable","reason":"reference is not an absolute URL"}"#
        );
    }
}
