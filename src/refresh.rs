//! # Refresh
//!
//! Polling for views that show live data. At most one polling task exists at
//! a time and it belongs to the channel on screen: following another channel
//! aborts it, and so does dropping the [`Refresher`].

use std::future::Future;

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

use crate::channels::Channel;

struct Poll {
    channel: String,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct Refresher {
    current: Option<Poll>,
}

impl Refresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_channel(&self) -> Option<&str> {
        self.current.as_ref().map(|poll| poll.channel.as_str())
    }

    /// Switches polling to `channel`. The first fetch runs immediately, then
    /// once per the view's refresh interval. Views without an interval only
    /// stop the previous task. Must be called inside a tokio runtime.
    pub fn follow<F, Fut>(&mut self, channel: &Channel, mut fetch: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.active_channel() == Some(channel.id.as_str()) {
            return;
        }

        self.stop();

        let Some(period) = channel.view.refresh_interval() else {
            return;
        };

        debug!("Polling {} every {:?}", channel.id, period);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                fetch().await;
            }
        });

        self.current = Some(Poll {
            channel: channel.id.clone(),
            handle,
        });
    }

    pub fn stop(&mut self) {
        if let Some(poll) = self.current.take() {
            debug!("Stopped polling {}", poll.channel);
            poll.handle.abort();
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.stop();
    }
}
