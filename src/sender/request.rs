use crate::domain::{ShipperError, TagSet};
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use url::Url;

/// Collector host used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://logs-01.loggly.com";

/// Header carrying the comma-joined tag set.
pub const TAG_HEADER: &str = "x-loggly-tag";

const INPUTS_SEGMENT: &str = "inputs";
// Trailing empty segment keeps the collector's trailing slash.
const COLLECTOR_SEGMENTS: [&str; 3] = ["tag", "http", ""];

/// A fully built POST, ready for the dispatcher. Never reused across events.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundRequest {
    pub fn tag_header(&self) -> Option<&str> {
        self.headers
            .get(TAG_HEADER)
            .and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// Pure transformation from an encoded payload and tags to an `OutboundRequest`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    user_agent: HeaderValue,
}

impl RequestBuilder {
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self, ShipperError> {
        if base_url.cannot_be_a_base() {
            return Err(ShipperError::Configuration(format!(
                "Endpoint '{base_url}' cannot carry a collector path"
            )));
        }

        let user_agent = HeaderValue::from_str(user_agent).map_err(|e| {
            ShipperError::Configuration(format!("Invalid user agent '{user_agent}': {e}"))
        })?;

        Ok(Self {
            base_url,
            user_agent,
        })
    }

    pub fn from_endpoint(endpoint: &str, user_agent: &str) -> Result<Self, ShipperError> {
        let base_url = Url::parse(endpoint).map_err(|e| {
            ShipperError::Configuration(format!("Invalid endpoint URL '{endpoint}': {e}"))
        })?;
        Self::new(base_url, user_agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn validate_token(token: &str) -> Result<(), ShipperError> {
        if token.trim().is_empty() {
            return Err(ShipperError::Configuration(
                "Authentication token is not set".to_string(),
            ));
        }
        Ok(())
    }

    /// `<base>/inputs/<token>/tag/http/`. The token is percent-encoded as a
    /// single path segment.
    pub fn collector_url(&self, token: &str) -> Result<Url, ShipperError> {
        Self::validate_token(token)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ShipperError::Configuration(format!(
                    "Endpoint '{}' cannot carry a collector path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(INPUTS_SEGMENT)
            .push(token)
            .extend(COLLECTOR_SEGMENTS);

        Ok(url)
    }

    pub fn build(
        &self,
        token: &str,
        payload: Bytes,
        tags: &TagSet,
    ) -> Result<OutboundRequest, ShipperError> {
        let url = self.collector_url(token)?;
        let headers = self.build_headers(tags)?;

        Ok(OutboundRequest {
            url,
            headers,
            body: payload,
        })
    }

    pub fn build_headers(&self, tags: &TagSet) -> Result<HeaderMap, ShipperError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());

        if let Some(joined) = tags.to_header_value() {
            let value = HeaderValue::from_str(&joined).map_err(|e| {
                ShipperError::Encoding(format!("Tags cannot be sent as a header: {e}"))
            })?;
            headers.insert(HeaderName::from_static(TAG_HEADER), value);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::from_endpoint(DEFAULT_ENDPOINT, "loggly-shipper/test").unwrap()
    }

    #[test]
    fn test_collector_url_embeds_token() {
        let url = builder().collector_url("abc-123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://logs-01.loggly.com/inputs/abc-123/tag/http/"
        );
    }

    #[test]
    fn test_collector_url_keeps_base_path() {
        let builder =
            RequestBuilder::from_endpoint("http://proxy.internal/loggly/", "agent").unwrap();
        let url = builder.collector_url("tok").unwrap();
        assert_eq!(url.path(), "/loggly/inputs/tok/tag/http/");
    }

    #[test]
    fn test_token_is_a_single_segment() {
        let url = builder().collector_url("a/b").unwrap();
        assert_eq!(url.path(), "/inputs/a%2Fb/tag/http/");
    }

    #[test]
    fn test_blank_token_is_configuration_error() {
        for token in ["", "   "] {
            let err = builder()
                .build(token, Bytes::from_static(b"{}"), &TagSet::new())
                .unwrap_err();
            assert!(err.is_configuration(), "token {token:?}");
        }
    }

    #[test]
    fn test_request_shape() {
        let tags: TagSet = ["b", "a"].into_iter().collect();
        let request = builder()
            .build("tok", Bytes::from_static(br#"{"message":"x"}"#), &tags)
            .unwrap();

        assert_eq!(request.tag_header(), Some("a,b"));
        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(request.body, Bytes::from_static(br#"{"message":"x"}"#));
        assert_eq!(
            request.headers.get(USER_AGENT).unwrap(),
            "loggly-shipper/test"
        );
    }

    #[test]
    fn test_empty_tags_omit_header() {
        let request = builder()
            .build("tok", Bytes::from_static(b"{}"), &TagSet::new())
            .unwrap();
        assert!(request.tag_header().is_none());
        assert!(!request.headers.contains_key(TAG_HEADER));
    }

    #[test]
    fn test_control_characters_in_tags_fail_encoding() {
        let tags: TagSet = ["bad\ntag"].into_iter().collect();
        let err = builder()
            .build("tok", Bytes::from_static(b"{}"), &tags)
            .unwrap_err();
        assert!(err.is_encoding());
    }

    #[test]
    fn test_unusable_endpoints() {
        assert!(
            RequestBuilder::from_endpoint("not a url", "agent")
                .unwrap_err()
                .is_configuration()
        );
        assert!(
            RequestBuilder::from_endpoint("mailto:ops@example.com", "agent")
                .unwrap_err()
                .is_configuration()
        );
    }
}
