//! The in-memory working set of links
//!
//! A `LinkCollection` is what one operation-cycle loads, mutates and hands
//! back to the store. It keeps links in canonical order: visits descending,
//! ties in the order they were stored.

use serde::Serialize;

use crate::models::{normalize_name, Link};

/// Ordered set of links persisted as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkCollection {
    links: Vec<Link>,
}

impl LinkCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from stored links and rank it
    pub fn from_links(links: Vec<Link>) -> Self {
        let mut collection = Self { links };
        collection.rank();
        collection
    }

    /// Re-sort into canonical order.
    ///
    /// `sort_by` is stable, so links with equal visit counts keep their
    /// relative order.
    pub fn rank(&mut self) {
        self.links.sort_by(|a, b| b.visits.cmp(&a.visits));
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    pub fn as_slice(&self) -> &[Link] {
        &self.links
    }

    pub fn into_links(self) -> Vec<Link> {
        self.links
    }

    /// Position of the unique link addressed by `name`.
    ///
    /// Returns `None` when nothing matches or when a corrupted store holds
    /// more than one link under the same normalized name.
    pub fn position(&self, name: &str) -> Option<usize> {
        let mut found = self
            .links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.matches(name))
            .map(|(idx, _)| idx);

        match (found.next(), found.next()) {
            (Some(idx), None) => Some(idx),
            _ => None,
        }
    }

    /// The unique link addressed by `name`
    pub fn find(&self, name: &str) -> Option<&Link> {
        self.position(name).map(|idx| &self.links[idx])
    }

    /// Mutable access to the unique link addressed by `name`
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Link> {
        self.position(name).map(move |idx| &mut self.links[idx])
    }

    /// Update the link called `name` in place, or append a new one.
    ///
    /// Returns a copy of the resulting link and whether it was created.
    pub fn upsert(&mut self, name: &str, url: &str) -> (Link, bool) {
        if let Some(link) = self.find_mut(name) {
            link.reset(url);
            return (link.clone(), false);
        }

        let link = Link::new(name, url);
        self.links.push(link.clone());
        (link, true)
    }

    /// Remove the unique link addressed by `name`
    pub fn remove(&mut self, name: &str) -> Option<Link> {
        self.position(name).map(|idx| self.links.remove(idx))
    }

    /// Names starting with `prefix` (case-insensitive), in canonical order
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.links
            .iter()
            .filter(|link| link.name.to_lowercase().starts_with(&prefix))
            .map(|link| link.name.clone())
            .collect()
    }
}

impl From<Vec<Link>> for LinkCollection {
    fn from(links: Vec<Link>) -> Self {
        Self::from_links(links)
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl IntoIterator for LinkCollection {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

/// Normalized names that appear more than once
pub fn duplicate_names(links: &[Link]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut dupes = Vec::new();
    for link in links {
        let key = normalize_name(&link.name);
        if !seen.insert(key.clone()) && !dupes.contains(&key) {
            dupes.push(key);
        }
    }
    dupes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(name: &str, visits: u64) -> Link {
        Link {
            name: name.to_string(),
            url: format!("https://{}.example.com", name),
            date: "2024-01-01T00:00:00+0000".to_string(),
            visits,
        }
    }

    fn names(collection: &LinkCollection) -> Vec<&str> {
        collection.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_rank_is_visits_descending_and_stable() {
        let collection =
            LinkCollection::from_links(vec![link("a", 3), link("b", 10), link("c", 3)]);
        assert_eq!(names(&collection), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let collection = LinkCollection::from_links(vec![link("github", 0)]);
        assert!(collection.find("GitHub").is_some());
        assert!(collection.find("  github ").is_some());
        assert!(collection.find("gitlab").is_none());
    }

    #[test]
    fn test_find_with_duplicates_is_none() {
        let collection = LinkCollection::from_links(vec![link("dup", 1), link("DUP", 2)]);
        assert!(collection.find("dup").is_none());
        assert_eq!(duplicate_names(collection.as_slice()), vec!["dup".to_string()]);
        assert!(collection.clone().remove("dup").is_none());
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut collection = LinkCollection::new();

        let (created, was_created) = collection.upsert(" Docs ", "https://docs.rs");
        assert!(was_created);
        assert_eq!(created.name, "docs");

        collection.find_mut("docs").unwrap().visits = 7;

        let (updated, was_created) = collection.upsert("DOCS", " https://doc.rust-lang.org ");
        assert!(!was_created);
        assert_eq!(updated.visits, 0);
        assert_eq!(updated.url, "https://doc.rust-lang.org");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut collection = LinkCollection::from_links(vec![link("a", 1), link("b", 2)]);
        let removed = collection.remove("A").unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(names(&collection), vec!["b"]);
        assert!(collection.remove("a").is_none());
    }

    #[test]
    fn test_names_with_prefix() {
        let collection = LinkCollection::from_links(vec![
            link("docs", 1),
            link("gitlab", 2),
            link("github", 5),
        ]);
        assert_eq!(collection.names_with_prefix("gi"), vec!["github", "gitlab"]);
        assert_eq!(collection.names_with_prefix("GI"), vec!["github", "gitlab"]);
        assert_eq!(
            collection.names_with_prefix(""),
            vec!["github", "gitlab", "docs"]
        );
        assert!(collection.names_with_prefix("x").is_empty());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let collection = LinkCollection::from_links(vec![link("a", 0)]);
        let json = serde_json::to_value(&collection).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "a");
    }

    #[test]
    fn test_duplicate_names() {
        let links = vec![link("a", 0), link("A", 0), link("b", 0), link("a", 0)];
        assert_eq!(duplicate_names(&links), vec!["a"]);
        assert!(duplicate_names(&[link("x", 0)]).is_empty());
    }
}
