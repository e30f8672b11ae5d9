//! User-Agent string for API requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/quaepoena/leksemvariasjon";

/// Default User-Agent for DH-lab requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("leksemvariasjon/{version} (research-tool; +{PROJECT_UA_URL})")
}
