use serde::{Deserialize, Serialize};

/// What counts as a Klaviyo tracking link.
///
/// A URI belongs to the platform when its scheme is allowed and either its
/// host is (a subdomain of) a tracking domain or its path starts with the
/// tracking prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingConfig {
    #[serde(default = "default_tracking_domains")]
    pub tracking_domains: Vec<String>,
    #[serde(default = "default_tracking_path_prefix")]
    pub tracking_path_prefix: String,
    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: Vec<String>,
}

fn default_tracking_domains() -> Vec<String> {
    vec!["klviyomail.com".to_string()]
}

fn default_tracking_path_prefix() -> String {
    "/u/".to_string()
}

fn default_allowed_schemes() -> Vec<String> {
    vec!["https".to_string(), "http".to_string()]
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            tracking_domains: default_tracking_domains(),
            tracking_path_prefix: default_tracking_path_prefix(),
            allowed_schemes: default_allowed_schemes(),
        }
    }
}
