use std::{sync::Arc, time::Duration};

use portfolio::ChannelRegistry;
use reqwest::Client;

use super::{
    config::Config,
    database::{RedisStore, init_redis},
    guestbook::Guestbook,
    spotify::NowPlaying,
    status::DeviceStatus,
};

pub struct AppState<S = RedisStore> {
    pub config: Config,
    pub registry: ChannelRegistry,
    pub guestbook: Guestbook<S>,
    pub device_status: DeviceStatus<S>,
    pub now_playing: NowPlaying,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Arc<Self>> {
        let config = Config::load()?;

        let redis = RedisStore::new(init_redis(&config.redis_url).await?);

        let http = Client::builder().timeout(Duration::from_secs(5)).build()?;
        let now_playing = NowPlaying::new(http, config.spotify.clone());

        Ok(Arc::new(Self {
            registry: ChannelRegistry::standard(),
            guestbook: Guestbook::new(redis.clone()),
            device_status: DeviceStatus::new(redis, config.status_history_cap),
            now_playing,
            config,
        }))
    }
}
