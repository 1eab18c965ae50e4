//! User requests: `protocol/text` or `#name/text`.
//!
//! Named requests resolve through [`ProtocolSource`], a read-only view of
//! whatever store the caller owns. The engine never holds or mutates that
//! store.

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use crate::error::RequestError;

/// Read-only lookup of saved protocols by name.
pub trait ProtocolSource {
    /// Protocol string saved under `name`.
    fn protocol(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> ProtocolSource for HashMap<String, String, S> {
    fn protocol(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl ProtocolSource for BTreeMap<String, String> {
    fn protocol(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// A source with no saved protocols.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProtocols;

impl ProtocolSource for NoProtocols {
    fn protocol(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// A protocol string paired with the text to apply it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    protocol: String,
    text: String,
    name: Option<String>,
}

impl Request {
    /// Parses `input`.
    ///
    /// The input is trimmed and split at the first `/`. A leading `#` makes
    /// the left side a protocol name looked up in `source`.
    pub fn parse(input: &str, source: &impl ProtocolSource) -> Result<Self, RequestError> {
        let input = input.trim();

        if let Some(named) = input.strip_prefix('#') {
            let (name, text) =
                named.split_once('/').ok_or(RequestError::MissingSeparator { form: "#name/text" })?;
            let protocol = source
                .protocol(name)
                .ok_or_else(|| RequestError::UnknownProtocol { name: name.to_owned() })?;

            return Ok(Self {
                protocol: protocol.to_owned(),
                text: text.to_owned(),
                name: Some(name.to_owned()),
            });
        }

        let (protocol, text) =
            input.split_once('/').ok_or(RequestError::MissingSeparator { form: "protocol/text" })?;
        Ok(Self { protocol: protocol.to_owned(), text: text.to_owned(), name: None })
    }

    /// The protocol string.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The text to transform.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the saved protocol, for `#name/text` requests.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved() -> HashMap<String, String> {
        HashMap::from([("base32".to_string(), "p3m2".to_string())])
    }

    #[test]
    fn literal_request() {
        let request = Request::parse("  p3/123 ", &NoProtocols).expect("valid request");
        assert_eq!(request.protocol(), "p3");
        assert_eq!(request.text(), "123");
        assert_eq!(request.name(), None);
    }

    #[test]
    fn text_may_contain_slashes() {
        let request = Request::parse("p3/a/b", &NoProtocols).expect("valid request");
        assert_eq!(request.protocol(), "p3");
        assert_eq!(request.text(), "a/b");
    }

    #[test]
    fn named_request_resolves_protocol() {
        let request = Request::parse("#base32/Привет", &saved()).expect("valid request");
        assert_eq!(request.protocol(), "p3m2");
        assert_eq!(request.text(), "Привет");
        assert_eq!(request.name(), Some("base32"));
    }

    #[test]
    fn named_request_with_btree_source() {
        let source = BTreeMap::from([("x".to_string(), "w3".to_string())]);
        let request = Request::parse("#x/t", &source).expect("valid request");
        assert_eq!(request.protocol(), "w3");
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            Request::parse("#nope/abc", &saved()),
            Err(RequestError::UnknownProtocol { name: "nope".to_string() })
        );
    }

    #[test]
    fn missing_separator_is_reported() {
        assert_eq!(
            Request::parse("p3", &NoProtocols),
            Err(RequestError::MissingSeparator { form: "protocol/text" })
        );
        assert_eq!(
            Request::parse("#base32", &saved()),
            Err(RequestError::MissingSeparator { form: "#name/text" })
        );
    }
}
