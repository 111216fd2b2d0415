//! # Routing
//!
//! Path segments map 1:1 to channel ids. The root path is the home grid,
//! which sits outside the channel cycle. `/channels/<id>` is accepted as a
//! legacy alias of `/<id>`.

use crate::channels::ChannelRegistry;

const LEGACY_PREFIX: &str = "channels";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Channel(String),
}

impl Route {
    /// Unknown segments resolve to the registry's default channel.
    pub fn parse(path: &str, registry: &ChannelRegistry) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        let segment = match segments.next() {
            Some(LEGACY_PREFIX) => segments.next(),
            other => other,
        };

        match segment {
            None => Route::Home,
            Some(slug) => Route::Channel(registry.resolve(slug).id.clone()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Channel(id) => format!("/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home() {
        let registry = ChannelRegistry::standard();

        assert_eq!(Route::parse("/", &registry), Route::Home);
        assert_eq!(Route::parse("", &registry), Route::Home);
        assert_eq!(Route::parse("/channels", &registry), Route::Home);
    }

    #[test]
    fn test_channel_segments() {
        let registry = ChannelRegistry::standard();

        assert_eq!(
            Route::parse("/projects", &registry),
            Route::Channel("projects".into())
        );
        assert_eq!(
            Route::parse("/channels/guestbook", &registry),
            Route::Channel("guestbook".into())
        );
        assert_eq!(
            Route::parse("/spotify/?x=1", &registry),
            Route::Channel("spotify".into())
        );
    }

    #[test]
    fn test_unknown_segment_falls_back() {
        let registry = ChannelRegistry::standard();

        assert_eq!(
            Route::parse("/settings", &registry),
            Route::Channel("experience".into())
        );
        assert_eq!(Route::Channel("resume".into()).path(), "/resume");
        assert_eq!(Route::Home.path(), "/");
    }
}
