//! Committed-change notifications: in-process pub-sub over a broadcast channel.
//!
//! The store publishes an event after each commit and any number of
//! subscribers follow along (live views, loggers, tests). A slow subscriber
//! may observe a lagged gap; the feed carries notifications, not state, so
//! readers re-fetch on receipt.

use crate::models::{GameId, PlayerId, TournamentId};
use serde::Serialize;
use tokio::sync::broadcast;

/// Buffered events per subscriber before a slow reader starts lagging.
const FEED_CAPACITY: usize = 256;

/// A committed mutation of league state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    PlayerRegistered { player_id: PlayerId },
    PlayerRenamed { player_id: PlayerId },
    PlayerRemoved { player_id: PlayerId },
    TournamentCreated { tournament_id: TournamentId, games: usize },
    GameSaved { tournament_id: TournamentId, game_id: GameId },
}

/// Publisher handle. Cloning shares the underlying channel.
#[derive(Clone, Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publish a committed change. A send with no subscribers is not an error.
    pub(crate) fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
