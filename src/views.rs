//! # Views
//!
//! Rendering handles for channels. Each channel carries exactly one
//! [`ChannelView`], chosen when the registry is built, so nothing downstream
//! has to branch on channel names.

use std::time::Duration;

use serde::Serialize;

pub const GITHUB_URL: &str = "https://github.com/w1lt";
pub const SPOTIFY_URL: &str = "https://open.spotify.com/";
pub const RESUME_PDF_PATH: &str = "/resume/pdf";

pub const NOW_PLAYING_REFRESH: Duration = Duration::from_secs(10);
pub const DEVICE_STATUS_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelView {
    Experience,
    Projects,
    NowPlaying,
    Resume,
    Guestbook,
    DeviceStatus,
}

/// Secondary footer button. The primary button is always "Home".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FooterAction {
    /// In-app move to another channel, sliding forward.
    OpenChannel(&'static str),
    External(&'static str),
    Download(&'static str),
    Refresh,
    Home,
}

impl ChannelView {
    pub fn footer_label(self) -> &'static str {
        match self {
            ChannelView::Experience => "View Resume",
            ChannelView::Projects => "View GitHub",
            ChannelView::NowPlaying => "Visit my Spotify",
            ChannelView::Resume => "Download PDF",
            ChannelView::DeviceStatus => "Refresh",
            ChannelView::Guestbook => "Home",
        }
    }

    pub fn footer_action(self) -> FooterAction {
        match self {
            ChannelView::Experience => FooterAction::OpenChannel("resume"),
            ChannelView::Projects => FooterAction::External(GITHUB_URL),
            ChannelView::NowPlaying => FooterAction::External(SPOTIFY_URL),
            ChannelView::Resume => FooterAction::Download(RESUME_PDF_PATH),
            ChannelView::DeviceStatus => FooterAction::Refresh,
            ChannelView::Guestbook => FooterAction::Home,
        }
    }

    /// Polling period while the view is on screen, if it polls at all.
    pub fn refresh_interval(self) -> Option<Duration> {
        match self {
            ChannelView::NowPlaying => Some(NOW_PLAYING_REFRESH),
            ChannelView::DeviceStatus => Some(DEVICE_STATUS_REFRESH),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_views() {
        assert_eq!(
            ChannelView::NowPlaying.refresh_interval(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(
            ChannelView::DeviceStatus.refresh_interval(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(ChannelView::Experience.refresh_interval(), None);
        assert_eq!(ChannelView::Guestbook.refresh_interval(), None);
    }

    #[test]
    fn test_footer_actions() {
        assert_eq!(
            ChannelView::Experience.footer_action(),
            FooterAction::OpenChannel("resume")
        );
        assert_eq!(
            ChannelView::Resume.footer_action(),
            FooterAction::Download("/resume/pdf")
        );
        assert_eq!(ChannelView::Guestbook.footer_label(), "Home");
    }
}
