use std::borrow::Borrow;
use std::fmt;

/// Identifier of a discrete predicate extracted from an instance
///
/// Features are compared by name only. A weight vector keyed by `Feature`
/// can be queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature(String);

impl Feature {
    /// Create a new feature from its name
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self(name.into())
    }

    /// Feature name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Feature {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Borrow<str> for Feature {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Feature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_feature_creation() {
        let f1 = Feature::new("w=walk|t=sunny");
        assert_eq!(f1.as_str(), "w=walk|t=sunny");

        let f2 = Feature::from("bias");
        let f3 = Feature::from(String::from("bias"));
        assert_eq!(f2, f3);
        assert_eq!(f2.to_string(), "bias");
    }

    #[test]
    fn test_feature_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(Feature::from("f1"), 1.0);
        assert_eq!(map.get("f1"), Some(&1.0));
        assert_eq!(map.get("f2"), None);
    }
}
