//! # Navigation
//!
//! Controller for the swipeable channel pages.
//!
//! ## States
//! - **Idle**: no transition in flight, commands are accepted.
//! - **Transitioning**: a lateral slide started less than [`TRANSITION_LOCK`]
//!   ago. Every `go_to`/`step` is dropped until the lock expires.
//! - **Leaving**: `go_home` started the zoom-out. After [`HOME_DELAY`] a
//!   single [`Effect::NavigateRoot`] is emitted and the controller is done.
//!
//! ## Timers
//! Time is passed in by the caller on every event, so the controller never
//! owns a timer. The lock expires on a fixed delay measured from the command
//! that took it, not from the end of the animation. A new slide can begin
//! slightly before the outgoing page has finished moving.
//!
//! ## Effects
//! Operations return the side effect the host must perform (push a history
//! entry, start the zoom-out, leave for the root page). The controller never
//! touches the address bar itself.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    channels::{Channel, ChannelRegistry},
    route::Route,
    views::{ChannelView, FooterAction},
};

pub const TRANSITION_LOCK: Duration = Duration::from_millis(500);
pub const HOME_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    None,
    Forward,
    Backward,
}

impl Direction {
    pub fn from_offset(offset: i64) -> Self {
        match offset.signum() {
            1 => Direction::Forward,
            -1 => Direction::Backward,
            _ => Direction::None,
        }
    }

    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
            Direction::None => 0,
        }
    }

    /// Side the incoming page slides in from.
    pub fn enter_from(self) -> Side {
        match self {
            Direction::Forward => Side::Right,
            Direction::Backward => Side::Left,
            Direction::None => Side::Center,
        }
    }

    /// Side the outgoing page slides out to.
    pub fn exit_to(self) -> Side {
        match self {
            Direction::Forward => Side::Left,
            Direction::Backward => Side::Right,
            Direction::None => Side::Center,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Center,
    Right,
}

/// Presentation variant for the page currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Slide(Direction),
    ZoomOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the visible location without a full reload.
    PushLocation(String),
    /// Start the zoom-out; root navigation follows after `navigate_after`.
    ZoomOut { navigate_after: Duration },
    /// Full navigation to the home grid.
    NavigateRoot,
    OpenExternal(&'static str),
    Download(&'static str),
    Refresh,
}

/// Discrete input understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Step(i64),
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Arrow bindings owned by the page-level key handler. Escape is handled
    /// by [`Navigator::handle_key`] directly.
    pub fn arrow_command(self) -> Option<Command> {
        match self {
            Key::ArrowLeft => Some(Command::Step(-1)),
            Key::ArrowRight => Some(Command::Step(1)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Staying,
    Leaving { at: Instant },
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: String,
    pending_direction: Direction,
    locked_until: Option<Instant>,
    exit: Exit,
}

impl NavigationState {
    pub fn current_channel_id(&self) -> &str {
        &self.current
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn is_transition_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    pub fn is_leaving(&self) -> bool {
        self.exit != Exit::Staying
    }

    pub fn transition(&self) -> Transition {
        match self.exit {
            Exit::Staying => Transition::Slide(self.pending_direction),
            _ => Transition::ZoomOut,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    registry: ChannelRegistry,
    state: NavigationState,
}

impl Navigator {
    pub fn new(registry: ChannelRegistry, initial: &str) -> Self {
        let current = registry.resolve(initial).id.clone();

        Self {
            registry,
            state: NavigationState {
                current,
                pending_direction: Direction::None,
                locked_until: None,
                exit: Exit::Staying,
            },
        }
    }

    /// `None` for the home grid, which has no channel pager.
    pub fn from_path(registry: ChannelRegistry, path: &str) -> Option<Self> {
        match Route::parse(path, &registry) {
            Route::Home => None,
            Route::Channel(id) => Some(Self::new(registry, &id)),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn current(&self) -> &Channel {
        self.registry.resolve(&self.state.current)
    }

    pub fn current_view(&self) -> ChannelView {
        self.current().view
    }

    pub fn go_to(&mut self, id: &str, direction: Direction, now: Instant) -> Option<Effect> {
        self.release_expired(now);

        if self.state.is_leaving() {
            debug!("Ignoring navigation to {id}, leaving for home");
            return None;
        }

        if self.state.is_transition_locked(now) {
            debug!("Ignoring navigation to {id}, transition locked");
            return None;
        }

        let channel = self.registry.resolve(id);
        if channel.id != id {
            debug!("Unknown channel {id}, falling back to {}", channel.id);
        }

        self.state.current = channel.id.clone();
        self.state.pending_direction = direction;
        self.state.locked_until = Some(now + TRANSITION_LOCK);

        Some(Effect::PushLocation(channel.path()))
    }

    pub fn step(&mut self, offset: i64, now: Instant) -> Option<Effect> {
        let from = self
            .registry
            .index_of(&self.state.current)
            .unwrap_or_default();
        let next = self.registry.step_index(from, offset);
        let id = self.registry.at(next).id.clone();

        self.go_to(&id, Direction::from_offset(offset), now)
    }

    pub fn go_home(&mut self, now: Instant) -> Option<Effect> {
        if self.state.is_leaving() {
            return None;
        }

        self.state.exit = Exit::Leaving {
            at: now + HOME_DELAY,
        };

        Some(Effect::ZoomOut {
            navigate_after: HOME_DELAY,
        })
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) -> Option<Effect> {
        match key {
            Key::Escape => self.go_home(now),
            _ => None,
        }
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) -> Option<Effect> {
        match command {
            Command::Step(offset) => self.step(offset, now),
            Command::Home => self.go_home(now),
        }
    }

    /// Runs the secondary footer button of the current view.
    pub fn activate_footer(&mut self, now: Instant) -> Option<Effect> {
        match self.current_view().footer_action() {
            FooterAction::OpenChannel(id) => self.go_to(id, Direction::Forward, now),
            FooterAction::External(url) => Some(Effect::OpenExternal(url)),
            FooterAction::Download(path) => Some(Effect::Download(path)),
            FooterAction::Refresh => Some(Effect::Refresh),
            FooterAction::Home => self.go_home(now),
        }
    }

    /// Timer callback. Releases an expired lock and fires the pending root
    /// navigation once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        self.release_expired(now);

        match self.state.exit {
            Exit::Leaving { at } if now >= at => {
                self.state.exit = Exit::Left;
                Some(Effect::NavigateRoot)
            }
            _ => None,
        }
    }

    fn release_expired(&mut self, now: Instant) {
        if self.state.locked_until.is_some_and(|until| now >= until) {
            self.state.locked_until = None;
        }
    }
}
