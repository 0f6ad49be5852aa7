//! Dynamic finders: `find_by_<attr>[_and_<attr>...]` resolved at call time.

use quorum_core::ServiceError;
use quorum_sql::Value;

use crate::predicate::Conditions;

const PREFIX: &str = "find_by_";
const CONJUNCTION: &str = "_and_";

/// A parsed finder name.
///
/// ```ignore
/// let finder = Finder::parse("find_by_fname_and_lname")?;
/// let conditions = finder.bind(vec!["Ada".into(), "Lovelace".into()])?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finder {
    name: String,
    attributes: Vec<String>,
}

impl Finder {
    pub fn parse(name: &str) -> Result<Self, ServiceError> {
        let rest = name.strip_prefix(PREFIX).ok_or_else(|| {
            ServiceError::MalformedQuery(format!("'{name}' is not a find_by_ finder"))
        })?;

        let attributes: Vec<String> = rest.split(CONJUNCTION).map(str::to_string).collect();
        if attributes.iter().any(|a| a.is_empty() || !is_identifier(a)) {
            return Err(ServiceError::MalformedQuery(format!(
                "'{name}' does not name its attributes"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            attributes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute names in the order they appear in the finder name.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Pair attributes with positional arguments, left to right.
    pub fn bind(&self, args: Vec<Value>) -> Result<Conditions, ServiceError> {
        if args.len() != self.attributes.len() {
            return Err(ServiceError::MalformedQuery(format!(
                "{} expects {} argument(s), got {}",
                self.name,
                self.attributes.len(),
                args.len()
            )));
        }
        Ok(self.attributes.iter().cloned().zip(args).collect())
    }
}

fn is_identifier(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
