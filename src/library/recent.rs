use crate::domain::track::TrackId;

/// Maximum number of entries kept in the recent list.
pub const RECENT_LIMIT: usize = 6;

/// Most-recent-first history of played tracks, bounded and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentList {
    ids: Vec<TrackId>,
}

impl RecentList {
    /// Builds a list from persisted ids, dropping duplicates and overflow.
    pub fn from_ids<I: IntoIterator<Item = TrackId>>(ids: I) -> Self {
        let mut list = Self::default();
        for id in ids {
            if list.ids.len() == RECENT_LIMIT {
                break;
            }
            if !list.ids.contains(&id) {
                list.ids.push(id);
            }
        }
        list
    }

    /// Moves `id` to the front, inserting it if new.
    pub fn touch(&mut self, id: TrackId) {
        self.ids.retain(|i| *i != id);
        self.ids.insert(0, id);
        self.ids.truncate(RECENT_LIMIT);
    }

    pub fn remove(&mut self, id: &TrackId) {
        self.ids.retain(|i| i != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
