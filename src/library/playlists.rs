use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::domain::track::TrackId;

/// Name of the playlist that always holds every track id.
pub const ALL_SONGS: &str = "All Songs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    ids: Vec<TrackId>,
}

impl Playlist {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ids: Vec::new(),
        }
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// appends `id` unless already present, returns whether it was added
    pub fn push(&mut self, id: TrackId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        before != self.ids.len()
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Playlists keyed by name, in creation order. "All Songs" is always first.
///
/// Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlists {
    lists: Vec<Playlist>,
}

impl Default for Playlists {
    fn default() -> Self {
        Self {
            lists: vec![Playlist::new(ALL_SONGS)],
        }
    }
}

impl Playlists {
    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.lists.iter().find(|p| p.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.lists.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn all_songs(&self) -> &Playlist {
        // the constructor and every mutation keep ALL_SONGS at index 0
        &self.lists[0]
    }

    pub(crate) fn all_songs_mut(&mut self) -> &mut Playlist {
        &mut self.lists[0]
    }

    /// Adds an empty playlist. Returns false for an empty or taken name.
    pub(crate) fn create(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.lists.push(Playlist::new(name));
        true
    }

    /// Removes `id` from every playlist.
    pub(crate) fn excise(&mut self, id: &TrackId) {
        for list in &mut self.lists {
            list.remove(id);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.lists.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Playlist> {
        self.lists.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    fn from_entries(entries: Vec<(String, Vec<TrackId>)>) -> Self {
        let mut playlists = Self::default();
        for (name, ids) in entries {
            if name.is_empty() {
                continue;
            }
            if name != ALL_SONGS && !playlists.create(&name) {
                continue;
            }
            if let Some(list) = playlists.get_mut(&name) {
                for id in ids {
                    list.push(id);
                }
            }
        }
        playlists
    }
}

impl Serialize for Playlists {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lists.len()))?;
        for list in &self.lists {
            map.serialize_entry(&list.name, &list.ids)?;
        }
        map.end()
    }
}

struct PlaylistsVisitor;

impl<'de> Visitor<'de> for PlaylistsVisitor {
    type Value = Playlists;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of playlist name to track ids")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some((name, ids)) = access.next_entry::<String, Vec<TrackId>>()? {
            entries.push((name, ids));
        }
        Ok(Playlists::from_entries(entries))
    }
}

impl<'de> Deserialize<'de> for Playlists {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PlaylistsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TrackId {
        TrackId::from(s)
    }

    #[test]
    fn test_default_has_only_all_songs() {
        let playlists = Playlists::default();
        assert_eq!(playlists.names().collect::<Vec<_>>(), vec![ALL_SONGS]);
        assert!(playlists.all_songs().is_empty());
    }

    #[test]
    fn test_create_rejects_empty_and_duplicate_names() {
        let mut playlists = Playlists::default();
        assert!(playlists.create("Chill"));
        assert!(!playlists.create("Chill"));
        assert!(!playlists.create(""));
        assert!(!playlists.create(ALL_SONGS));
        // case-sensitive
        assert!(playlists.create("chill"));
        assert_eq!(playlists.len(), 3);
    }

    #[test]
    fn test_push_ignores_duplicates() {
        let mut playlists = Playlists::default();
        let list = playlists.all_songs_mut();
        assert!(list.push(id("a")));
        assert!(!list.push(id("a")));
        assert!(list.push(id("b")));
        assert_eq!(list.ids(), &[id("a"), id("b")]);
    }

    #[test]
    fn test_serde_keeps_order_and_restores_all_songs() -> anyhow::Result<()> {
        let json = r#"{"Zed": ["b"], "All Songs": ["a", "b"], "Alpha": ["a", "a"]}"#;
        let playlists: Playlists = serde_json::from_str(json)?;

        assert_eq!(
            playlists.names().collect::<Vec<_>>(),
            vec![ALL_SONGS, "Zed", "Alpha"]
        );
        assert_eq!(playlists.get("Alpha").map(|p| p.ids().to_vec()), Some(vec![id("a")]));

        let out = serde_json::to_string(&playlists)?;
        assert_eq!(out, r#"{"All Songs":["a","b"],"Zed":["b"],"Alpha":["a"]}"#);

        let missing: Playlists = serde_json::from_str(r#"{"Chill": []}"#)?;
        assert!(missing.contains(ALL_SONGS));
        Ok(())
    }
}
