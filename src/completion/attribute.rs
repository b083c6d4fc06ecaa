//! Attribute path resolver
//!
//! Turns a dotted fragment such as `bestFriend.dog.wat` into attribute name
//! guesses. Every segment but the last must name a relation; the walk follows
//! those relations from the root record type, and the last segment is matched
//! against the attributes of the type it lands on.

use std::sync::Arc;

use crate::schema::{Attribute, AttributeTable, SchemaProvider};

/// Where a dotted fragment resolves to
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    /// Record type the partial segment is matched against
    pub record_type: String,
    /// Canonical names of the relations walked
    pub segments: Vec<String>,
    /// The unfinished last segment
    pub partial: String,
    attributes: Arc<AttributeTable>,
}

impl ResolvedPath {
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }
}

/// Resolves dotted attribute paths against a schema
pub struct AttributeGuesser<'a> {
    provider: &'a dyn SchemaProvider,
    root_type: &'a str,
    qualified: bool,
}

impl<'a> AttributeGuesser<'a> {
    pub fn new(provider: &'a dyn SchemaProvider, root_type: &'a str) -> Self {
        Self {
            provider,
            root_type,
            qualified: false,
        }
    }

    /// Prefix each guess with the walked path (`dog.waterBowl` rather than `waterBowl`)
    pub fn qualified(mut self, qualified: bool) -> Self {
        self.qualified = qualified;
        self
    }

    /// Walk `text` from the root type
    ///
    /// Returns `None` when the root type is unknown or a segment does not name
    /// a relation to a known type.
    pub fn resolve(&self, text: &str) -> Option<ResolvedPath> {
        let mut segments: Vec<&str> = text.split('.').collect();
        let partial = segments.pop().unwrap_or_default();

        let mut record_type = self.root_type.to_string();
        let mut attributes = self.provider.attributes(&record_type)?;
        let mut walked = Vec::with_capacity(segments.len());

        for segment in segments {
            let (name, attribute) = lookup(&attributes, segment)?;
            let related = attribute.related_type()?;
            let next = self.provider.attributes(related)?;

            walked.push(name.to_string());
            record_type = related.to_string();
            attributes = next;
        }

        Some(ResolvedPath {
            record_type,
            segments: walked,
            partial: partial.to_string(),
            attributes,
        })
    }

    /// Attribute names matching the last segment of `text`
    ///
    /// Names starting with the partial segment come first, followed by names
    /// containing it further in. Matching ignores case.
    pub fn guesses(&self, text: &str) -> Vec<String> {
        let Some(path) = self.resolve(text) else {
            return Vec::new();
        };

        let partial = path.partial.to_lowercase();
        let lowered: Vec<(&str, String)> = path
            .attributes()
            .keys()
            .map(|name| (name.as_str(), name.to_lowercase()))
            .collect();

        let prefixed = lowered
            .iter()
            .filter(|(_, lower)| lower.starts_with(&partial));
        let inner = lowered
            .iter()
            .filter(|(_, lower)| lower.find(&partial).is_some_and(|at| at > 0));

        let qualifier = if self.qualified && !path.segments.is_empty() {
            format!("{}.", path.segments.join("."))
        } else {
            String::new()
        };

        prefixed
            .chain(inner)
            .map(|(name, _)| format!("{qualifier}{name}"))
            .collect()
    }
}

/// Exact name first, then a case-insensitive match
fn lookup<'t>(attributes: &'t AttributeTable, segment: &str) -> Option<(&'t str, &'t Attribute)> {
    if let Some((name, attribute)) = attributes.get_key_value(segment) {
        return Some((name.as_str(), attribute));
    }
    let wanted = segment.to_lowercase();
    attributes
        .iter()
        .find(|(name, _)| name.to_lowercase() == wanted)
        .map(|(name, attribute)| (name.as_str(), attribute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn registry() -> SchemaRegistry {
        let registry = SchemaRegistry::new();
        registry.define(
            "Person",
            [
                ("name", Attribute::scalar("String")),
                ("bestFriend", Attribute::to_one("Person")),
                ("dog", Attribute::to_one("Dog")),
                ("blogged", Attribute::scalar("Boolean")),
                ("logins", Attribute::to_many("Login")),
            ]
            .into_iter()
            .map(|(n, a)| (n.to_string(), a))
            .collect(),
        );
        registry.define(
            "Dog",
            [
                ("master", Attribute::to_one("Person")),
                ("waterBowl", Attribute::to_one("Bowl")),
            ]
            .into_iter()
            .map(|(n, a)| (n.to_string(), a))
            .collect(),
        );
        registry.define(
            "Bowl",
            [("type", Attribute::scalar("String"))]
                .into_iter()
                .map(|(n, a)| (n.to_string(), a))
                .collect(),
        );
        registry
    }

    #[test]
    fn test_empty_text_lists_every_attribute() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person");
        assert_eq!(
            guesser.guesses(""),
            vec!["name", "bestFriend", "dog", "blogged", "logins"]
        );
    }

    #[test]
    fn test_prefix_matches_before_inner_matches() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person");
        assert_eq!(guesser.guesses("log"), vec!["logins", "blogged"]);
    }

    #[test]
    fn test_walks_relations() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person");
        assert_eq!(guesser.guesses("dog.w"), vec!["waterBowl"]);
        assert_eq!(guesser.guesses("bestfriend.dog."), vec!["master", "waterBowl"]);
    }

    #[test]
    fn test_qualified_uses_canonical_names() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person").qualified(true);
        assert_eq!(guesser.guesses("dog.w"), vec!["dog.waterBowl"]);
        assert_eq!(
            guesser.guesses("bestfriend.dog.w"),
            vec!["bestFriend.dog.waterBowl"]
        );
        assert_eq!(guesser.guesses("na"), vec!["name"]);
    }

    #[test]
    fn test_walk_stops_on_scalar_or_missing() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person");
        assert!(guesser.guesses("name.x").is_empty());
        assert!(guesser.guesses("cat.").is_empty());
    }

    #[test]
    fn test_walk_stops_on_unknown_related_type() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person");
        assert!(guesser.guesses("logins.").is_empty());
    }

    #[test]
    fn test_unknown_root() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Ghost");
        assert!(guesser.guesses("").is_empty());
        assert!(guesser.resolve("a.b").is_none());
    }

    #[test]
    fn test_resolve_reports_landing_type() {
        let registry = registry();
        let guesser = AttributeGuesser::new(&registry, "Person");
        let path = guesser.resolve("dog.waterBowl.t").unwrap();
        assert_eq!(path.record_type, "Bowl");
        assert_eq!(path.segments, vec!["dog", "waterBowl"]);
        assert_eq!(path.partial, "t");
        assert!(path.attributes().contains_key("type"));
    }
}
