//! # Channel Registry
//!
//! Static, ordered list of destinations. Order defines the cyclic
//! next/previous sequence, and the first entry is the fallback for any id
//! that does not resolve.

use serde::Serialize;

use crate::views::ChannelView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: String,
    pub icon: String,
    pub order: usize,
    #[serde(skip)]
    pub view: ChannelView,
}

impl Channel {
    pub fn path(&self) -> String {
        format!("/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

const STANDARD: [(&str, &str, ChannelView); 6] = [
    ("experience", "💼", ChannelView::Experience),
    ("projects", "🚀", ChannelView::Projects),
    ("spotify", "🎵", ChannelView::NowPlaying),
    ("resume", "📄", ChannelView::Resume),
    ("guestbook", "📖", ChannelView::Guestbook),
    ("mac-status", "💻", ChannelView::DeviceStatus),
];

impl ChannelRegistry {
    /// Builds a registry from `(id, icon, view)` triples, assigning `order`
    /// by position. Returns `None` for an empty list or duplicate ids.
    pub fn new<I, S>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = (S, S, ChannelView)>,
        S: Into<String>,
    {
        let mut channels: Vec<Channel> = Vec::new();

        for (order, (id, icon, view)) in entries.into_iter().enumerate() {
            let id = id.into();

            if channels.iter().any(|c| c.id == id) {
                return None;
            }

            channels.push(Channel {
                id,
                icon: icon.into(),
                order,
                view,
            });
        }

        if channels.is_empty() {
            return None;
        }

        Some(Self { channels })
    }

    pub fn standard() -> Self {
        Self {
            channels: STANDARD
                .iter()
                .enumerate()
                .map(|(order, (id, icon, view))| Channel {
                    id: id.to_string(),
                    icon: icon.to_string(),
                    order,
                    view: *view,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always false, an empty registry cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn default_channel(&self) -> &Channel {
        &self.channels[0]
    }

    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.id == id)
    }

    pub fn at(&self, index: usize) -> &Channel {
        &self.channels[index % self.channels.len()]
    }

    /// Resolves an id, falling back to the default channel.
    pub fn resolve(&self, id: &str) -> &Channel {
        self.get(id).unwrap_or_else(|| self.default_channel())
    }

    /// Index reached by moving `offset` positions from `from`, wrapping in
    /// both directions. Always within `0..len`.
    pub fn step_index(&self, from: usize, offset: i64) -> usize {
        let len = self.channels.len() as i64;
        let from = (from as i64).rem_euclid(len);

        (from + offset.rem_euclid(len)).rem_euclid(len) as usize
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(n: usize) -> ChannelRegistry {
        ChannelRegistry::new(
            (0..n).map(|i| (format!("c{i}"), "x".to_string(), ChannelView::Experience)),
        )
        .unwrap()
    }

    #[test]
    fn test_standard_order() {
        let registry = ChannelRegistry::standard();
        let ids: Vec<&str> = registry.channels().iter().map(|c| c.id.as_str()).collect();

        assert_eq!(
            ids,
            ["experience", "projects", "spotify", "resume", "guestbook", "mac-status"]
        );
        assert_eq!(registry.default_channel().id, "experience");
        assert_eq!(registry.get("guestbook").unwrap().order, 4);
    }

    #[test]
    fn test_resolve_fallback() {
        let registry = ChannelRegistry::standard();

        assert_eq!(registry.resolve("projects").id, "projects");
        assert_eq!(registry.resolve("settings").id, "experience");
        assert_eq!(registry.resolve("").id, "experience");
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(ChannelRegistry::new(Vec::<(String, String, ChannelView)>::new()).is_none());
        assert!(
            ChannelRegistry::new([
                ("a", "x", ChannelView::Experience),
                ("a", "y", ChannelView::Projects),
            ])
            .is_none()
        );
    }

    #[test]
    fn test_cyclic_closure() {
        for n in 1..=8 {
            let registry = sized(n);

            for start in 0..n {
                let mut forward = start;
                for _ in 0..n {
                    forward = registry.step_index(forward, 1);
                }
                assert_eq!(forward, start);

                let there = registry.step_index(start, 1);
                assert_eq!(registry.step_index(there, -1), start);
            }
        }
    }

    #[test]
    fn test_step_stays_in_range() {
        for n in 1..=6 {
            let registry = sized(n);

            for start in 0..n {
                for offset in [-1_000_001, -13, -7, -1, 0, 1, 5, 99, i64::MAX, i64::MIN] {
                    assert!(registry.step_index(start, offset) < n);
                }
            }
        }
    }

    #[test]
    fn test_wraparound() {
        let registry = ChannelRegistry::standard();

        assert_eq!(registry.step_index(5, 1), 0);
        assert_eq!(registry.step_index(0, -1), 5);
    }
}
