use tracing::{debug, info};

use super::{
    BusRegistration, ControlAction, PlaybackState, RegistryError, StateReport, StatusChange,
    TabId, TrackMetadata,
};
use crate::services::native_messaging::{OutboundMessage, OutboundSender};

/// In-memory player for one browser tab.
///
/// Holds the last state the extension reported and relays control
/// commands back to it. The extension is the source of truth and resends
/// the full state on every change, so nothing here is interpolated or
/// validated.
#[derive(Debug)]
pub struct Player {
    id: TabId,
    playback_state: PlaybackState,
    position: f64,
    metadata: TrackMetadata,
    outbound: OutboundSender,
    bus: BusRegistration,
}

impl Player {
    /// Create a stopped player for `id` with unknown metadata
    pub fn new(id: TabId, outbound: OutboundSender, bus: BusRegistration) -> Self {
        Self {
            id,
            playback_state: PlaybackState::Stopped,
            position: 0.0,
            metadata: TrackMetadata::unknown(),
            outbound,
            bus,
        }
    }

    /// Tab this player represents
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Current playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.playback_state
    }

    /// Last reported position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current track metadata
    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    /// Bus name announced for this player, if any
    pub fn bus_name(&self) -> Option<&str> {
        self.bus.name()
    }

    /// Apply a state report from the extension.
    ///
    /// `playing` maps to Playing or Paused; a player never returns to
    /// Stopped. Returns the transition when the playback state changed.
    pub fn update_state(&mut self, report: &StateReport) -> Option<StatusChange> {
        let old = self.playback_state;
        self.playback_state = PlaybackState::from(report.playing.unwrap_or(false));
        self.position = report.position.unwrap_or(0.0);
        self.metadata = TrackMetadata::from(report);

        if old == self.playback_state {
            return None;
        }

        info!(
            tab_id = %self.id,
            old = %old,
            new = %self.playback_state,
            "Playback state changed"
        );
        Some(StatusChange {
            old,
            new: self.playback_state,
        })
    }

    /// Whether the tab is playing
    pub fn is_playing(&self) -> bool {
        self.playback_state == PlaybackState::Playing
    }

    /// Ask the tab to start playback
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn play(&self) -> Result<(), RegistryError> {
        self.send(ControlAction::Play)
    }

    /// Ask the tab to pause playback
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn pause(&self) -> Result<(), RegistryError> {
        self.send(ControlAction::Pause)
    }

    /// Ask the tab to toggle playback
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn play_pause(&self) -> Result<(), RegistryError> {
        self.send(ControlAction::PlayPause)
    }

    /// Ask the tab to stop playback
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn stop(&self) -> Result<(), RegistryError> {
        self.send(ControlAction::Stop)
    }

    /// Ask the tab to skip forward
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn next(&self) -> Result<(), RegistryError> {
        self.send(ControlAction::Next)
    }

    /// Ask the tab to go back
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn previous(&self) -> Result<(), RegistryError> {
        self.send(ControlAction::Previous)
    }

    /// Run one control action
    ///
    /// # Errors
    /// Returns error if the upstream writer has shut down
    pub fn perform(&self, action: ControlAction) -> Result<(), RegistryError> {
        match action {
            ControlAction::Play => self.play(),
            ControlAction::Pause => self.pause(),
            ControlAction::PlayPause => self.play_pause(),
            ControlAction::Stop => self.stop(),
            ControlAction::Next => self.next(),
            ControlAction::Previous => self.previous(),
        }
    }

    /// Release the player's bus registration. Idempotent.
    pub fn cleanup(&mut self) {
        self.bus.release();
    }

    fn send(&self, action: ControlAction) -> Result<(), RegistryError> {
        debug!(tab_id = %self.id, command = action.command_name(), "Sending control command");
        self.outbound
            .send(OutboundMessage::command(action, self.id))
            .map_err(|_| RegistryError::ControlFailed("upstream channel closed".to_string()))
    }
}
