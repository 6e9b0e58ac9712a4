use std::collections::BTreeMap;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

use super::{
    BusRegistration, ControlAction, ListSnapshot, Player, RegistryError, RegistryEvent,
    StateReport, StatusSnapshot, TabId, TabSummary,
};
use crate::{config::BusConfig, services::native_messaging::OutboundSender};

/// Sender half of the registry event channel
pub type RegistryEventSender = broadcast::Sender<RegistryEvent>;

/// Live players keyed by tab id.
///
/// One exclusive lock guards the whole map. Every method is a complete
/// logical operation that takes the lock once and releases it before
/// returning, so callers can never hold it across their own I/O.
pub struct Registry {
    players: Mutex<BTreeMap<TabId, Player>>,
    outbound: OutboundSender,
    bus: BusConfig,
    events_tx: RegistryEventSender,
}

impl Registry {
    /// Create an empty registry whose players send commands through `outbound`
    pub fn new(outbound: OutboundSender, bus: BusConfig) -> Self {
        let (events_tx, _) = broadcast::channel(256);

        Self {
            players: Mutex::new(BTreeMap::new()),
            outbound,
            bus,
            events_tx,
        }
    }

    /// Subscribe to player lifecycle and playback events
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events_tx.subscribe()
    }

    /// Create the player for `tab_id` if needed, then apply `report` to it
    pub async fn upsert(&self, tab_id: TabId, report: &StateReport) {
        let mut players = self.players.lock().await;

        let player = players.entry(tab_id).or_insert_with(|| {
            info!(%tab_id, "Created player");
            self.emit(RegistryEvent::PlayerCreated(tab_id));
            Player::new(
                tab_id,
                self.outbound.clone(),
                BusRegistration::announce(&self.bus, tab_id),
            )
        });

        if let Some(change) = player.update_state(report) {
            self.emit(RegistryEvent::PlaybackChanged {
                tab_id,
                old: change.old,
                new: change.new,
            });
        }
    }

    /// Remove the player for `tab_id`.
    ///
    /// Returns whether a player was removed; an untracked id is a no-op.
    pub async fn remove(&self, tab_id: TabId) -> bool {
        let mut players = self.players.lock().await;

        let Some(mut player) = players.remove(&tab_id) else {
            debug!(%tab_id, "Close for untracked tab ignored");
            return false;
        };

        player.cleanup();
        info!(%tab_id, "Removed player");
        self.emit(RegistryEvent::PlayerRemoved(tab_id));
        true
    }

    /// Aggregate playback status across all tabs
    pub async fn status_snapshot(&self) -> StatusSnapshot {
        let players = self.players.lock().await;

        let playing_tabs: Vec<TabId> = players
            .values()
            .filter(|player| player.is_playing())
            .map(Player::id)
            .collect();

        StatusSnapshot {
            playing: !playing_tabs.is_empty(),
            tab_count: players.len(),
            playing_tabs,
        }
    }

    /// Per-tab summaries of every tracked player
    pub async fn list_snapshot(&self) -> ListSnapshot {
        let players = self.players.lock().await;

        players
            .iter()
            .map(|(tab_id, player)| {
                let summary = TabSummary {
                    playing: player.is_playing(),
                    title: player.metadata().title.clone(),
                    artist: player.metadata().first_artist().to_string(),
                    status: player.playback_state().to_string(),
                };
                (tab_id.to_string(), summary)
            })
            .collect()
    }

    /// Run the action named `action` on the player for `tab_id`.
    ///
    /// The tab is looked up before the action name is checked.
    ///
    /// # Errors
    /// - `RegistryError::TabNotFound` if the tab is not tracked
    /// - `RegistryError::UnknownAction` if the name is not a control action
    /// - `RegistryError::ControlFailed` if the command could not be queued
    pub async fn dispatch_action(
        &self,
        tab_id: TabId,
        action: &str,
    ) -> Result<ControlAction, RegistryError> {
        let players = self.players.lock().await;

        let player = players
            .get(&tab_id)
            .ok_or(RegistryError::TabNotFound(tab_id))?;
        let action: ControlAction = action.parse()?;
        player.perform(action)?;

        debug!(%tab_id, command = action.command_name(), "Dispatched action");
        Ok(action)
    }

    /// Number of tracked tabs
    pub async fn len(&self) -> usize {
        self.players.lock().await.len()
    }

    /// Whether no tabs are tracked
    pub async fn is_empty(&self) -> bool {
        self.players.lock().await.is_empty()
    }

    fn emit(&self, event: RegistryEvent) {
        let _ = self.events_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::services::native_messaging::{OutboundMessage, OutboundReceiver, outbound_channel};
    use crate::services::players::PlaybackState;

    fn registry() -> (Registry, OutboundReceiver) {
        let (tx, rx) = outbound_channel();
        let bus = BusConfig {
            announce_names: false,
            ..BusConfig::default()
        };
        (Registry::new(tx, bus), rx)
    }

    fn report(playing: bool, title: &str) -> StateReport {
        StateReport {
            playing: Some(playing),
            title: Some(title.to_string()),
            ..StateReport::default()
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_in_place() {
        let (registry, _rx) = registry();

        registry.upsert(TabId(1), &report(true, "Song A")).await;
        registry.upsert(TabId(1), &report(false, "Song B")).await;

        assert_eq!(registry.len().await, 1);
        let list = registry.list_snapshot().await;
        assert_eq!(list["1"].title, "Song B");
        assert_eq!(list["1"].status, "Paused");
        assert!(!list["1"].playing);
    }

    #[tokio::test]
    async fn remove_untracked_is_noop() {
        let (registry, _rx) = registry();

        assert!(!registry.remove(TabId(42)).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn removed_id_comes_back_as_new_player() {
        let (registry, _rx) = registry();
        let mut events = registry.subscribe();

        registry.upsert(TabId(5), &report(true, "a")).await;
        assert!(registry.remove(TabId(5)).await);
        registry.upsert(TabId(5), &report(false, "b")).await;

        assert_eq!(events.recv().await.unwrap(), RegistryEvent::PlayerCreated(TabId(5)));
        assert!(matches!(
            events.recv().await.unwrap(),
            RegistryEvent::PlaybackChanged { new: PlaybackState::Playing, .. }
        ));
        assert_eq!(events.recv().await.unwrap(), RegistryEvent::PlayerRemoved(TabId(5)));
        assert_eq!(events.recv().await.unwrap(), RegistryEvent::PlayerCreated(TabId(5)));
        assert_eq!(
            events.recv().await.unwrap(),
            RegistryEvent::PlaybackChanged {
                tab_id: TabId(5),
                old: PlaybackState::Stopped,
                new: PlaybackState::Paused,
            }
        );
    }

    #[tokio::test]
    async fn status_snapshot_tracks_last_update_per_tab() {
        let (registry, _rx) = registry();
        let ops: &[(i64, Option<bool>)] = &[
            (1, Some(true)),
            (2, Some(false)),
            (3, Some(true)),
            (1, Some(false)),
            (3, None),
            (4, Some(true)),
            (2, Some(true)),
            (4, None),
        ];
        let mut expected: BTreeMap<i64, bool> = BTreeMap::new();

        for (id, op) in ops {
            match op {
                Some(playing) => {
                    registry.upsert(TabId(*id), &report(*playing, "t")).await;
                    expected.insert(*id, *playing);
                }
                None => {
                    registry.remove(TabId(*id)).await;
                    expected.remove(id);
                }
            }

            let status = registry.status_snapshot().await;
            let expected_playing: BTreeSet<TabId> = expected
                .iter()
                .filter(|(_, playing)| **playing)
                .map(|(id, _)| TabId(*id))
                .collect();

            assert_eq!(status.tab_count, expected.len());
            assert_eq!(status.tab_count, registry.len().await);
            assert_eq!(
                status.playing_tabs.iter().copied().collect::<BTreeSet<_>>(),
                expected_playing
            );
            assert_eq!(status.playing, !expected_playing.is_empty());
        }
    }

    #[tokio::test]
    async fn dispatch_action_on_absent_tab_is_not_found() {
        let (registry, mut rx) = registry();

        let result = registry.dispatch_action(TabId(1), "pause").await;

        assert_eq!(result, Err(RegistryError::TabNotFound(TabId(1))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_action_sends_exactly_one_command() {
        let (registry, mut rx) = registry();
        registry.upsert(TabId(7), &report(true, "t")).await;

        let action = registry.dispatch_action(TabId(7), "play_pause").await;

        assert_eq!(action, Ok(ControlAction::PlayPause));
        assert_eq!(
            rx.try_recv().unwrap(),
            OutboundMessage::command(ControlAction::PlayPause, TabId(7))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_action_rejects_unknown_name() {
        let (registry, mut rx) = registry();
        registry.upsert(TabId(7), &report(true, "t")).await;

        let result = registry.dispatch_action(TabId(7), "cleanup").await;

        assert_eq!(
            result,
            Err(RegistryError::UnknownAction("cleanup".to_string()))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn same_status_resend_emits_no_event() {
        let (registry, _rx) = registry();
        let mut events = registry.subscribe();

        registry.upsert(TabId(1), &report(false, "a")).await;
        registry.upsert(TabId(1), &report(true, "a")).await;
        registry.upsert(TabId(1), &report(true, "b")).await;
        registry.upsert(TabId(1), &report(false, "b")).await;

        let mut changes = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let RegistryEvent::PlaybackChanged { old, new, .. } = event {
                changes.push((old, new));
            }
        }

        assert_eq!(
            changes,
            vec![
                (PlaybackState::Stopped, PlaybackState::Paused),
                (PlaybackState::Paused, PlaybackState::Playing),
                (PlaybackState::Playing, PlaybackState::Paused),
            ]
        );
    }
}
