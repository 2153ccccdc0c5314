use std::{fmt, str::FromStr};

use rustc_hash::FxHashMap;

use crate::RepositoryError;

pub const NS_DEFAULT_URI: &str = "";
pub const NS_JCR_PREFIX: &str = "jcr";
pub const NS_JCR_URI: &str = "http://www.jcp.org/jcr/1.0";
pub const NS_NT_PREFIX: &str = "nt";
pub const NS_NT_URI: &str = "http://www.jcp.org/jcr/nt/1.0";
pub const NS_MIX_PREFIX: &str = "mix";
pub const NS_MIX_URI: &str = "http://www.jcp.org/jcr/mix/1.0";
pub const NS_SV_PREFIX: &str = "sv";
pub const NS_SV_URI: &str = "http://www.jcp.org/jcr/sv/1.0";
pub const NS_XML_PREFIX: &str = "xml";
pub const NS_XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// A qualified name, i.e. a namespace URI and a local part.
///
/// Displayed as `{namespace_uri}local_name`, which is also what [`FromStr`] accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    namespace_uri: String,
    local_name: String,
}

impl QName {
    pub fn new(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
        }
    }

    #[must_use]
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Parses a prefixed JCR name such as `jcr:primaryType` or `title`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::IllegalName`] for malformed names and
    /// [`RepositoryError::UnknownPrefix`] if `resolver` doesn't know the prefix.
    pub fn from_jcr_name(
        jcr_name: &str,
        resolver: &dyn NamespaceResolver,
    ) -> Result<Self, RepositoryError> {
        let (prefix, local_name) = jcr_name.split_once(':').unwrap_or(("", jcr_name));
        if local_name.is_empty() || local_name.contains(':') || jcr_name.starts_with(':') {
            return Err(RepositoryError::IllegalName(jcr_name.to_owned()));
        }
        let uri = resolver
            .uri(prefix)
            .ok_or_else(|| RepositoryError::UnknownPrefix(prefix.to_owned()))?;
        Ok(Self::new(uri, local_name))
    }

    /// Formats the name with the prefix `resolver` maps to its namespace.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownNamespace`] if no prefix is mapped to the namespace.
    pub fn to_jcr_name(&self, resolver: &dyn NamespaceResolver) -> Result<String, RepositoryError> {
        let prefix = resolver
            .prefix(&self.namespace_uri)
            .ok_or_else(|| RepositoryError::UnknownNamespace(self.namespace_uri.clone()))?;
        Ok(if prefix.is_empty() {
            self.local_name.clone()
        } else {
            format!("{prefix}:{}", self.local_name)
        })
    }
}

impl Default for QName {
    fn default() -> Self {
        Self::new(NS_DEFAULT_URI, "")
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace_uri, self.local_name)
    }
}

impl FromStr for QName {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('{')
            .and_then(|rest| rest.split_once('}'))
            .filter(|(_, local_name)| !local_name.is_empty())
            .map(|(uri, local_name)| Self::new(uri, local_name))
            .ok_or_else(|| RepositoryError::IllegalName(s.to_owned()))
    }
}

/// Maps namespace prefixes to URIs and back.
///
/// Mappings must stay stable for the duration of one
/// [`Importer::start_node`](crate::Importer::start_node) callback.
pub trait NamespaceResolver {
    /// Returns the namespace URI `prefix` is mapped to.
    fn uri(&self, prefix: &str) -> Option<&str>;
    /// Returns the prefix mapped to `uri`.
    fn prefix(&self, uri: &str) -> Option<&str>;
}

/// A mutable [`NamespaceResolver`] with the built-in JCR prefixes registered by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    uris: FxHashMap<String, String>,
    prefixes: FxHashMap<String, String>,
}

impl NamespaceMap {
    /// Creates a map without any mappings, not even the built-in ones.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            uris: FxHashMap::default(),
            prefixes: FxHashMap::default(),
        }
    }

    /// Maps `prefix` to `uri`, replacing earlier mappings of either.
    pub fn register(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let (prefix, uri) = (prefix.into(), uri.into());
        self.unregister(&prefix);
        if let Some(old_prefix) = self.prefixes.remove(&uri) {
            self.uris.remove(&old_prefix);
        }
        self.prefixes.insert(uri.clone(), prefix.clone());
        self.uris.insert(prefix, uri);
    }

    /// Removes the mapping of `prefix`, returning its URI.
    pub fn unregister(&mut self, prefix: &str) -> Option<String> {
        let uri = self.uris.remove(prefix)?;
        self.prefixes.remove(&uri);
        Some(uri)
    }
}

impl Default for NamespaceMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for (prefix, uri) in [
            ("", NS_DEFAULT_URI),
            (NS_JCR_PREFIX, NS_JCR_URI),
            (NS_NT_PREFIX, NS_NT_URI),
            (NS_MIX_PREFIX, NS_MIX_URI),
            (NS_SV_PREFIX, NS_SV_URI),
            (NS_XML_PREFIX, NS_XML_URI),
        ] {
            map.register(prefix, uri);
        }
        map
    }
}

impl NamespaceResolver for NamespaceMap {
    fn uri(&self, prefix: &str) -> Option<&str> {
        self.uris.get(prefix).map(String::as_str)
    }

    fn prefix(&self, uri: &str) -> Option<&str> {
        self.prefixes.get(uri).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn jcr_name() {
        let ns = NamespaceMap::default();
        let name = QName::from_jcr_name("jcr:primaryType", &ns).unwrap();
        assert_eq!(name, QName::new(NS_JCR_URI, "primaryType"));
        assert_eq!(name.to_jcr_name(&ns).unwrap(), "jcr:primaryType");

        let name = QName::from_jcr_name("title", &ns).unwrap();
        assert_eq!(name, QName::new("", "title"));
        assert_eq!(name.to_jcr_name(&ns).unwrap(), "title");
    }

    #[test]
    fn jcr_name_errors() {
        let ns = NamespaceMap::default();
        for illegal in ["", "jcr:", ":title", "a:b:c"] {
            assert!(
                matches!(
                    QName::from_jcr_name(illegal, &ns),
                    Err(RepositoryError::IllegalName(_))
                ),
                "{illegal:?} should be illegal"
            );
        }
        assert!(matches!(
            QName::from_jcr_name("acme:title", &ns),
            Err(RepositoryError::UnknownPrefix(prefix)) if prefix == "acme"
        ));
        assert!(matches!(
            QName::new("http://acme.example/1.0", "title").to_jcr_name(&ns),
            Err(RepositoryError::UnknownNamespace(_))
        ));
    }

    #[test]
    fn display_parse() {
        let name = QName::new(NS_NT_URI, "unstructured");
        assert_eq!(name.to_string(), "{http://www.jcp.org/jcr/nt/1.0}unstructured");
        assert_eq!(name.to_string().parse::<QName>().unwrap(), name);
        assert_eq!("{}title".parse::<QName>().unwrap(), QName::new("", "title"));

        assert!("title".parse::<QName>().is_err());
        assert!("{uri}".parse::<QName>().is_err());
    }

    #[test]
    fn remap() {
        let mut ns = NamespaceMap::default();
        ns.register("acme", "http://acme.example/1.0");
        ns.register("acme2", "http://acme.example/1.0");

        assert_eq!(ns.uri("acme"), None);
        assert_eq!(ns.uri("acme2"), Some("http://acme.example/1.0"));
        assert_eq!(ns.prefix("http://acme.example/1.0"), Some("acme2"));

        assert_eq!(ns.unregister("acme2").as_deref(), Some("http://acme.example/1.0"));
        assert_eq!(ns.prefix("http://acme.example/1.0"), None);
        assert_eq!(NamespaceMap::empty().uri(""), None);
    }
}
