use tokio::sync::broadcast;
use tracing::{debug, trace};

use lreg_crypto::HashChainVerifier;
use lreg_types::{Identity, Timestamp};

use crate::error::{JournalError, Result};
use crate::event::{EventCategory, EventKind, RegistryEvent};

/// Filter for subscribing to a subset of registry events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these categories are delivered.
    pub categories: Option<Vec<EventCategory>>,
    /// If set, only events caused by these identities are delivered.
    pub actors: Option<Vec<Identity>>,
}

impl EventFilter {
    /// Only `HashRegistered` events.
    pub fn registrations() -> Self {
        Self {
            categories: Some(vec![EventCategory::HashRegistered]),
            ..Default::default()
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &RegistryEvent) -> bool {
        if let Some(ref categories) = self.categories {
            if !categories.contains(&event.category()) {
                return false;
            }
        }
        if let Some(ref actors) = self.actors {
            if !actors.contains(event.kind.actor()) {
                return false;
            }
        }
        true
    }
}

/// A broadcast channel receiver for registry events.
pub type EventStream = broadcast::Receiver<RegistryEvent>;

struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<RegistryEvent>,
}

/// Append-only, hash-linked log of registry mutations.
///
/// Appends stamp the next sequence number and link to the previous event's
/// hash, then fan the event out to matching subscribers. Subscribers whose
/// receivers were all dropped are pruned on the next append.
pub struct EventJournal {
    events: Vec<RegistryEvent>,
    subscribers: Vec<Subscriber>,
    channel_capacity: usize,
}

impl EventJournal {
    pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CHANNEL_CAPACITY)
    }

    /// Journal whose subscriber channels buffer `channel_capacity` events.
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            subscribers: Vec::new(),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Append an event and deliver it to matching subscribers.
    pub fn append(&mut self, timestamp: Timestamp, kind: EventKind) -> RegistryEvent {
        let seq = self.events.len() as u64 + 1;
        let prev_hash = self.events.last().map(|e| e.event_hash);
        let event = RegistryEvent::new(seq, timestamp, kind, prev_hash);
        self.events.push(event.clone());
        self.route(&event);
        debug!(seq, category = %event.category(), hash = %event.short_hash(), "event appended");
        event
    }

    /// Register a subscriber. Only events appended after this call are
    /// delivered.
    pub fn subscribe(&mut self, filter: EventFilter) -> EventStream {
        let (sender, receiver) = broadcast::channel(self.channel_capacity);
        self.subscribers.push(Subscriber { filter, sender });
        receiver
    }

    fn route(&mut self, event: &RegistryEvent) {
        self.subscribers.retain(|sub| {
            if sub.filter.matches(event) {
                // Send fails only when every receiver is gone.
                sub.sender.send(event.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        trace!(subscribers = self.subscribers.len(), "event routed");
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Events with `seq` strictly greater than `after`.
    pub fn events_after(&self, after: u64) -> &[RegistryEvent] {
        let start = (after as usize).min(self.events.len());
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hash of the latest event, if any.
    pub fn head_hash(&self) -> Option<[u8; 32]> {
        self.events.last().map(|e| e.event_hash)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Check sequence contiguity and the hash chain.
    pub fn verify(&self) -> Result<()> {
        verify_events(&self.events)
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify an exported slice of events, e.g. one read back from an archive.
pub fn verify_events(events: &[RegistryEvent]) -> Result<()> {
    for (index, event) in events.iter().enumerate() {
        let expected = index as u64 + 1;
        if event.seq != expected {
            return Err(JournalError::SequenceGap {
                expected,
                found: event.seq,
            });
        }
    }
    HashChainVerifier::verify_chain(events)?;
    Ok(())
}
