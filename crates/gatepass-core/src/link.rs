// ── Verification link codec ──
//
// The sole wire-level contract of the pass system:
//     <origin>[<base_path>]/verify-visitor/<token>
// Building and parsing both live here so the two sides cannot drift.

use url::{Host, Url};

use crate::model::PassToken;

/// Path segment that routes to the verification flow.
pub const VERIFY_SEGMENT: &str = "verify-visitor";

/// Legacy plain-text label some older passes carried instead of a URL.
const LEGACY_LABEL: &str = "pass id: ";

/// Where verification links point.
///
/// `public_origin` and `base_path` are explicit configuration, not
/// sniffed from the runtime environment. `lan_dev_origin` substitutes
/// for a loopback origin so a phone on the same network can resolve the
/// link during development -- a deployment convenience, not a security
/// boundary.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub public_origin: Url,
    /// Application base path (e.g. `/community`). Empty for root.
    pub base_path: String,
    pub lan_dev_origin: Option<Url>,
}

impl LinkConfig {
    pub fn new(public_origin: Url) -> Self {
        Self {
            public_origin,
            base_path: String::new(),
            lan_dev_origin: None,
        }
    }

    /// The origin links are actually built against: the LAN override when
    /// the public origin is loopback, the public origin otherwise.
    pub fn effective_origin(&self) -> &Url {
        match (&self.lan_dev_origin, is_loopback(&self.public_origin)) {
            (Some(lan), true) => lan,
            _ => &self.public_origin,
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Build the verification URL for a token.
pub fn verification_url(cfg: &LinkConfig, token: &PassToken) -> Url {
    let base = cfg.effective_origin();
    let path = format!(
        "{}/{VERIFY_SEGMENT}/{token}",
        cfg.base_path.trim_end_matches('/')
    );

    let mut url = base.clone();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Extract a pass token from scanned or pasted input.
///
/// Accepts, in priority order: a full or partial URL containing
/// `/verify-visitor/<token>`, the legacy `"Pass ID: <token>"` label, or
/// a bare token. Returns `None` when nothing token-shaped is present.
pub fn extract_token(input: &str) -> Option<PassToken> {
    let trimmed = input.trim();

    let url_marker = format!("/{VERIFY_SEGMENT}/");
    if let Some(token) = token_after_marker(trimmed, &url_marker) {
        return Some(token);
    }
    if let Some(token) = token_after_marker(trimmed, LEGACY_LABEL) {
        return Some(token);
    }

    trimmed.parse().ok()
}

/// Find `marker` (ASCII case-insensitive) and parse the 36 characters
/// following it as a token.
fn token_after_marker(haystack: &str, marker: &str) -> Option<PassToken> {
    let lowered = haystack.to_ascii_lowercase();
    let idx = lowered.find(&marker.to_ascii_lowercase())?;
    let rest = haystack.get(idx + marker.len()..)?;
    rest.get(..36)?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cfg() -> LinkConfig {
        LinkConfig {
            public_origin: "https://community.example.org".parse().unwrap(),
            base_path: "/portal".into(),
            lan_dev_origin: None,
        }
    }

    #[test]
    fn url_embeds_base_path_and_token() {
        let token = PassToken::generate();
        let url = verification_url(&cfg(), &token);
        assert_eq!(
            url.as_str(),
            format!("https://community.example.org/portal/verify-visitor/{token}")
        );
    }

    #[test]
    fn empty_base_path_yields_root_route() {
        let mut cfg = cfg();
        cfg.base_path = String::new();
        let token = PassToken::generate();
        let url = verification_url(&cfg, &token);
        assert_eq!(
            url.path(),
            format!("/verify-visitor/{token}")
        );
    }

    #[test]
    fn loopback_origin_is_replaced_by_lan_override() {
        let cfg = LinkConfig {
            public_origin: "http://localhost:3001".parse().unwrap(),
            base_path: String::new(),
            lan_dev_origin: Some("http://192.168.0.111:3001".parse().unwrap()),
        };
        let token = PassToken::generate();
        let url = verification_url(&cfg, &token);
        assert_eq!(url.host_str(), Some("192.168.0.111"));
    }

    #[test]
    fn public_origin_ignores_lan_override() {
        let mut cfg = cfg();
        cfg.lan_dev_origin = Some("http://192.168.0.111:3001".parse().unwrap());
        let token = PassToken::generate();
        let url = verification_url(&cfg, &token);
        assert_eq!(url.host_str(), Some("community.example.org"));
    }

    #[test]
    fn extract_round_trips_built_urls() {
        let token = PassToken::generate();
        let url = verification_url(&cfg(), &token);
        assert_eq!(extract_token(url.as_str()), Some(token));
    }

    #[test]
    fn extract_accepts_path_only_input() {
        let token = PassToken::generate();
        let input = format!("/portal/verify-visitor/{token}");
        assert_eq!(extract_token(&input), Some(token));
    }

    #[test]
    fn extract_accepts_legacy_label() {
        let token = PassToken::generate();
        assert_eq!(extract_token(&format!("Pass ID: {token}")), Some(token));
        // the legacy matcher was case-insensitive
        assert_eq!(extract_token(&format!("PASS ID: {token}")), Some(token));
    }

    #[test]
    fn extract_accepts_bare_token() {
        let token = PassToken::generate();
        assert_eq!(extract_token(&format!("  {token}  ")), Some(token));
    }

    #[test]
    fn extract_rejects_unrecognized_input() {
        assert_eq!(extract_token("hello world"), None);
        assert_eq!(extract_token("/verify-visitor/not-a-token-here-zzzz"), None);
        assert_eq!(extract_token(""), None);
    }
}
