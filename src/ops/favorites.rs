use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::menu::{MenuItem, MenuRegistry};

/// Stored identity of a starred leaf: the percent-encoded href.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteKey(String);

impl FavoriteKey {
    pub fn from_href(href: &str) -> Self {
        FavoriteKey(urlencoding::encode(href).into_owned())
    }

    /// Decode back to the href. `None` if the stored key is not valid
    /// percent-encoding (hand-edited or corrupt data).
    pub fn to_href(&self) -> Option<String> {
        urlencoding::decode(&self.0).ok().map(|s| s.into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Starred leaves, persisted as a `key -> true` map. Unstarred entries are
/// removed, and `false` entries in stored data are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<FavoriteKey, bool>", into = "BTreeMap<FavoriteKey, bool>")]
pub struct FavoritesSet {
    entries: BTreeMap<FavoriteKey, bool>,
}

impl From<BTreeMap<FavoriteKey, bool>> for FavoritesSet {
    fn from(mut entries: BTreeMap<FavoriteKey, bool>) -> Self {
        entries.retain(|_, starred| *starred);
        FavoritesSet { entries }
    }
}

impl From<FavoritesSet> for BTreeMap<FavoriteKey, bool> {
    fn from(set: FavoritesSet) -> Self {
        set.entries
    }
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_starred(&self, href: &str) -> bool {
        self.entries
            .get(&FavoriteKey::from_href(href))
            .copied()
            .unwrap_or(false)
    }

    /// Flip one key. Returns the new starred state.
    pub fn toggle(&mut self, href: &str) -> bool {
        let key = FavoriteKey::from_href(href);
        let starred = !self.entries.get(&key).copied().unwrap_or(false);
        if starred {
            self.entries.insert(key, true);
        } else {
            self.entries.remove(&key);
        }
        starred
    }

    /// Pure form of [`FavoritesSet::toggle`]
    pub fn toggled(&self, href: &str) -> FavoritesSet {
        let mut next = self.clone();
        next.toggle(href);
        next
    }

    /// Hrefs currently starred, stale ones included
    pub fn starred_hrefs(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .filter(|(_, starred)| **starred)
            .filter_map(|(key, _)| key.to_href())
    }

    pub fn starred_count(&self) -> usize {
        self.entries.values().filter(|s| **s).count()
    }
}

/// Resolve starred keys against the live registry, in canonical leaf order.
/// Keys whose href no longer exists are skipped; they stay in the set.
pub fn project_favorites<'a>(
    registry: &'a MenuRegistry,
    favorites: &FavoritesSet,
) -> Vec<&'a MenuItem> {
    registry
        .leaves()
        .filter(|item| favorites.is_starred(&item.href))
        .collect()
}
