//! Seeking an externally owned video player.
//!
//! Two integrations are supported. In handle mode the controller owns a
//! player instance bound to the loaded video id and calls it directly. In
//! message mode it only has a frame reference and posts a `seekTo` command.

pub mod registry;

pub use registry::*;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::timestamp::TimeInput;

/// A mounted player instance.
pub trait PlayerHandle: Send {
    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool);
    fn play_video(&mut self);
    fn destroy(&mut self);
}

/// Creates player instances once the player API is available.
pub trait PlayerFactory: Send {
    fn create(&mut self, video_id: &str) -> Box<dyn PlayerHandle>;
}

/// An embedded frame that accepts posted commands.
pub trait FrameTarget: Send {
    fn post_message(&self, command: &PlayerCommand);
}

/// `{"event":"command","func":"seekTo","args":[seconds,true]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    pub event: String,
    pub func: String,
    pub args: (f64, bool),
}

impl PlayerCommand {
    pub fn seek_to(seconds: f64) -> Self {
        Self {
            event: "command".to_string(),
            func: "seekTo".to_string(),
            args: (seconds, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Unmounted,
    Loading { video_id: String },
    Ready { video_id: String },
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnparsableTime,
    NoPlayer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeekOutcome {
    Handle { seconds: f64 },
    Message { seconds: f64 },
    Ignored(IgnoreReason),
}

pub struct PlayerController {
    registry: Arc<PlayerApiRegistry>,
    factory: Option<Box<dyn PlayerFactory>>,
    state: PlayerState,
    handle: Option<Box<dyn PlayerHandle>>,
    frame: Option<Box<dyn FrameTarget>>,
}

impl PlayerController {
    pub fn new(registry: Arc<PlayerApiRegistry>) -> Self {
        Self {
            registry,
            factory: None,
            state: PlayerState::Unmounted,
            handle: None,
            frame: None,
        }
    }

    pub fn with_factory(mut self, factory: impl PlayerFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Video id the controller is loading or showing.
    pub fn video_id(&self) -> Option<&str> {
        match &self.state {
            PlayerState::Loading { video_id } | PlayerState::Ready { video_id } => Some(video_id),
            PlayerState::Unmounted | PlayerState::Destroyed => None,
        }
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn attach_frame(&mut self, frame: impl FrameTarget + 'static) {
        self.frame = Some(Box::new(frame));
    }

    pub fn detach_frame(&mut self) {
        self.frame = None;
    }

    /// Bind the controller to `video_id`. A different id tears the current
    /// instance down before loading the new one; the same id is a no-op.
    pub fn load(&mut self, video_id: &str) {
        if self.factory.is_none() {
            tracing::debug!(video_id, "No player factory, staying in message mode");
            return;
        }

        let current = self.video_id().map(str::to_string);
        match current.as_deref() {
            Some(current) if current == video_id => return,
            Some(_) => self.destroy(),
            None => {}
        }

        tracing::info!(video_id, "Loading player");
        self.state = PlayerState::Loading {
            video_id: video_id.to_string(),
        };

        if self.registry.is_ready() {
            self.on_api_ready();
        }
    }

    /// Finish a pending load once the player API is available.
    pub fn on_api_ready(&mut self) {
        let PlayerState::Loading { video_id } = &self.state else {
            return;
        };
        let video_id = video_id.clone();
        let Some(factory) = self.factory.as_mut() else {
            return;
        };

        self.handle = Some(factory.create(&video_id));
        tracing::info!(video_id = %video_id, "Player ready");
        self.state = PlayerState::Ready { video_id };
    }

    /// Load `video_id` and wait for the player API before creating the instance.
    pub async fn mount(&mut self, video_id: &str) {
        self.load(video_id);
        if matches!(self.state, PlayerState::Loading { .. }) {
            self.registry.wait_ready().await;
            self.on_api_ready();
        }
    }

    /// Tear down the owned instance, from any state.
    pub fn reset(&mut self) {
        self.destroy();
    }

    fn destroy(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.destroy();
        }
        if self.state != PlayerState::Destroyed {
            tracing::info!(previous = ?self.state, "Player destroyed");
        }
        self.state = PlayerState::Destroyed;
    }

    /// Seek to a time position and play. Unparsable input, or no mounted
    /// player, is a logged no-op.
    pub fn seek(&mut self, input: impl Into<TimeInput>) -> SeekOutcome {
        let input = input.into();
        let Some(seconds) = input.seconds() else {
            tracing::debug!(?input, "Ignoring seek to unparsable time");
            return SeekOutcome::Ignored(IgnoreReason::UnparsableTime);
        };

        if let Some(handle) = self.handle.as_mut() {
            handle.seek_to(seconds, true);
            handle.play_video();
            return SeekOutcome::Handle { seconds };
        }

        if let Some(frame) = self.frame.as_ref() {
            frame.post_message(&PlayerCommand::seek_to(seconds));
            return SeekOutcome::Message { seconds };
        }

        tracing::debug!(seconds, "Ignoring seek, no player mounted");
        SeekOutcome::Ignored(IgnoreReason::NoPlayer)
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.destroy();
        }
    }
}
