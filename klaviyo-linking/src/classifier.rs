use crate::config::LinkingConfig;
use crate::payload::PushPayload;
use url::Url;

/// Pure predicates deciding whether a payload or URI is Klaviyo's.
///
/// Platform membership is the first gate: every other predicate is false
/// for input that does not belong to the platform. URIs that fail to parse
/// never match.
#[derive(Debug, Clone, Default)]
pub struct MessageClassifier {
    config: LinkingConfig,
}

impl MessageClassifier {
    #[must_use]
    pub fn new(config: LinkingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LinkingConfig {
        &self.config
    }

    /// True iff the payload carries the Klaviyo marker.
    #[must_use]
    pub fn is_platform_payload(&self, payload: &PushPayload) -> bool {
        payload.has_marker()
    }

    /// True for platform payloads with a title or body to display, as
    /// opposed to silent pushes.
    #[must_use]
    pub fn is_notification(&self, payload: &PushPayload) -> bool {
        self.is_platform_payload(payload) && (payload.title().is_some() || payload.body().is_some())
    }

    #[must_use]
    pub fn is_platform_uri(&self, uri: &str) -> bool {
        Url::parse(uri).is_ok_and(|url| self.is_platform_url(&url))
    }

    /// True when the scheme is allowed and either the host is a tracking
    /// domain or the path carries the tracking prefix.
    #[must_use]
    pub fn is_platform_url(&self, url: &Url) -> bool {
        self.scheme_allowed(url) && (self.host_is_tracking(url) || self.path_is_tracking(url))
    }

    #[must_use]
    pub fn is_universal_tracking_link(&self, uri: &str) -> bool {
        Url::parse(uri).is_ok_and(|url| self.is_tracking_url(&url))
    }

    /// A platform URL that points somewhere, i.e. has a non-root path.
    #[must_use]
    pub fn is_tracking_url(&self, url: &Url) -> bool {
        self.is_platform_url(url) && !matches!(url.path(), "" | "/")
    }

    /// The tracking link carried by a platform payload's `url` field.
    #[must_use]
    pub fn tracking_link_in(&self, payload: &PushPayload) -> Option<Url> {
        if !self.is_platform_payload(payload) {
            return None;
        }
        payload.deep_link().filter(|url| self.is_tracking_url(url))
    }

    fn scheme_allowed(&self, url: &Url) -> bool {
        self.config
            .allowed_schemes
            .iter()
            .any(|scheme| scheme.eq_ignore_ascii_case(url.scheme()))
    }

    fn host_is_tracking(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.config.tracking_domains.iter().any(|domain| {
            let domain = domain.trim_start_matches('.').to_ascii_lowercase();
            !domain.is_empty()
                && (host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|rest| rest.ends_with('.')))
        })
    }

    fn path_is_tracking(&self, url: &Url) -> bool {
        let prefix = self.config.tracking_path_prefix.as_str();
        !prefix.is_empty() && url.path().starts_with(prefix)
    }
}
