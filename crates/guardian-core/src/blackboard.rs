//! Shared knowledge map, message bus and alert queue.
//!
//! Every operation takes the single inner lock for its whole duration, so read-then-write
//! sequences inside one call are atomic with respect to every other call. The simulation
//! currently drives it from one thread; the lock keeps that true if agent thinking is ever
//! spread across workers.

use std::any::Any;
use std::collections::{BTreeMap, VecDeque};
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    AgentId, Alert, AlertKind, Message, MessageBody, MessageError, Recipient, Severity, Vec2,
};

/// Default number of messages kept in the history log.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Typed handle to a knowledge slot.
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> core::fmt::Debug for BbKey<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BbKey").field(&self.name).finish()
    }
}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BaseStatus {
    #[default]
    Safe,
    Breached,
}

/// Most recent evader observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sighting {
    pub position: Vec2,
    pub observer: AgentId,
    pub seen_at: f64,
}

/// Canonical knowledge slots.
pub mod keys {
    use super::{BaseStatus, BbKey, Sighting};
    use crate::Vec2;

    pub const THIEF_POSITION: BbKey<Vec2> = BbKey::new("thief_position");
    pub const THIEF_LAST_SEEN: BbKey<Sighting> = BbKey::new("thief_last_seen");
    pub const RESOURCES_AT_BASE: BbKey<u32> = BbKey::new("resources_at_base");
    pub const RESOURCES_COLLECTED_TOTAL: BbKey<u32> = BbKey::new("resources_collected_total");
    pub const RESOURCE_LOCATIONS: BbKey<Vec<Vec2>> = BbKey::new("resources_locations");
    pub const BASE_STATUS: BbKey<BaseStatus> = BbKey::new("base_status");
    pub const ELAPSED_TIME: BbKey<f64> = BbKey::new("elapsed_time");
}

/// Typed copy of the canonical knowledge slots.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnowledgeSnapshot {
    pub thief_position: Option<Vec2>,
    pub thief_last_seen: Option<Sighting>,
    pub resources_at_base: u32,
    pub resources_collected_total: u32,
    pub resource_locations: Vec<Vec2>,
    pub base_status: BaseStatus,
    pub elapsed_time: f64,
}

type Slot = Box<dyn Any + Send + Sync>;

#[derive(Default)]
struct Knowledge {
    values: BTreeMap<&'static str, Slot>,
}

impl Knowledge {
    fn initial() -> Self {
        let mut k = Self::default();
        k.set(keys::RESOURCES_AT_BASE, 0);
        k.set(keys::RESOURCES_COLLECTED_TOTAL, 0);
        k.set(keys::RESOURCE_LOCATIONS, Vec::new());
        k.set(keys::BASE_STATUS, BaseStatus::Safe);
        k.set(keys::ELAPSED_TIME, 0.0);
        k
    }

    fn set<T: Send + Sync + 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.name, Box::new(value));
    }

    fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name)?;
        let typed = value.downcast_ref::<T>();
        if typed.is_none() {
            tracing::warn!(key = key.name, "knowledge type mismatch, treating as absent");
        }
        typed
    }

    fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name)?;
        let typed = value.downcast_mut::<T>();
        if typed.is_none() {
            tracing::warn!(key = key.name, "knowledge type mismatch, treating as absent");
        }
        typed
    }

    fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        match value.downcast::<T>() {
            Ok(b) => Some(*b),
            Err(_) => {
                tracing::warn!(key = key.name, "knowledge type mismatch on remove");
                None
            }
        }
    }
}

struct Inner {
    knowledge: Knowledge,
    queue: Vec<Message>,
    history: VecDeque<Message>,
    alerts: Vec<Alert>,
    next_message_id: u64,
}

impl Inner {
    fn new() -> Self {
        Self {
            knowledge: Knowledge::initial(),
            queue: Vec::new(),
            history: VecDeque::new(),
            alerts: Vec::new(),
            next_message_id: 1,
        }
    }

    fn now(&self) -> f64 {
        self.knowledge
            .get(keys::ELAPSED_TIME)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Knowledge access while the blackboard lock is held.
///
/// Obtained through [`Blackboard::post_many`]; every read and write through it is part of one
/// atomic step.
pub struct KnowledgeTxn<'a> {
    knowledge: &'a mut Knowledge,
}

impl KnowledgeTxn<'_> {
    pub fn post<T: Send + Sync + 'static>(&mut self, key: BbKey<T>, value: T) {
        self.knowledge.set(key, value);
    }

    pub fn read<T: Clone + 'static>(&self, key: BbKey<T>) -> Option<T> {
        self.knowledge.get(key).cloned()
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        self.knowledge.get_mut(key)
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        self.knowledge.remove(key)
    }
}

pub struct Blackboard {
    inner: Mutex<Inner>,
    history_limit: usize,
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Blackboard {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
            history_limit,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic elsewhere must not take the simulation down with it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Simulation clock used to stamp messages and alerts.
    pub fn now(&self) -> f64 {
        self.lock().now()
    }

    /// Overwrite a knowledge slot.
    pub fn post<T: Send + Sync + 'static>(&self, key: BbKey<T>, value: T) {
        self.lock().knowledge.set(key, value);
    }

    /// Copy a knowledge slot out; absent (or mistyped) slots read as `None`.
    pub fn read<T: Clone + 'static>(&self, key: BbKey<T>) -> Option<T> {
        self.lock().knowledge.get(key).cloned()
    }

    /// Borrow a knowledge slot under the lock without cloning it.
    pub fn inspect<T: 'static, R>(&self, key: BbKey<T>, f: impl FnOnce(&T) -> R) -> Option<R> {
        let inner = self.lock();
        inner.knowledge.get(key).map(f)
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.lock().knowledge.values.contains_key(key.name)
    }

    pub fn remove<T: 'static>(&self, key: BbKey<T>) -> Option<T> {
        self.lock().knowledge.remove(key)
    }

    /// Batch update: run `f` against the knowledge map with the lock held for its whole duration.
    pub fn post_many<R>(&self, f: impl FnOnce(&mut KnowledgeTxn<'_>) -> R) -> R {
        let mut inner = self.lock();
        let mut txn = KnowledgeTxn {
            knowledge: &mut inner.knowledge,
        };
        f(&mut txn)
    }

    pub fn snapshot_knowledge(&self) -> KnowledgeSnapshot {
        let inner = self.lock();
        let k = &inner.knowledge;
        KnowledgeSnapshot {
            thief_position: k.get(keys::THIEF_POSITION).copied(),
            thief_last_seen: k.get(keys::THIEF_LAST_SEEN).cloned(),
            resources_at_base: k.get(keys::RESOURCES_AT_BASE).copied().unwrap_or(0),
            resources_collected_total: k
                .get(keys::RESOURCES_COLLECTED_TOTAL)
                .copied()
                .unwrap_or(0),
            resource_locations: k.get(keys::RESOURCE_LOCATIONS).cloned().unwrap_or_default(),
            base_status: k.get(keys::BASE_STATUS).copied().unwrap_or_default(),
            elapsed_time: inner.now(),
        }
    }

    /// Queue a message and append it to the history log. Returns the assigned message id.
    pub fn send(&self, mut message: Message) -> u64 {
        let mut inner = self.lock();
        message.id = inner.next_message_id;
        inner.next_message_id += 1;
        message.sent_at = inner.now();

        tracing::debug!(
            id = message.id,
            sender = %message.sender,
            recipient = %message.recipient,
            kind = %message.kind(),
            "message sent"
        );

        if self.history_limit > 0 {
            inner.history.push_back(message.clone());
            while inner.history.len() > self.history_limit {
                inner.history.pop_front();
            }
        }
        inner.queue.push(message);
        inner.next_message_id - 1
    }

    pub fn broadcast(
        &self,
        sender: AgentId,
        body: MessageBody,
        priority: u8,
    ) -> Result<u64, MessageError> {
        let message = Message::new(sender, Recipient::Broadcast, body, priority)?;
        Ok(self.send(message))
    }

    /// Messages addressed to `recipient` (directly or by broadcast), in send order.
    ///
    /// Every returned message is marked read for `recipient` only; other recipients still see a
    /// broadcast until they fetch it themselves.
    pub fn fetch(&self, recipient: &AgentId, unread_only: bool) -> Vec<Message> {
        let mut inner = self.lock();
        let mut out = Vec::new();
        let mut fetched_ids = Vec::new();
        for message in inner.queue.iter_mut() {
            if !message.recipient.includes(recipient) {
                continue;
            }
            if unread_only && message.is_read_by(recipient) {
                continue;
            }
            message.mark_read(recipient);
            fetched_ids.push(message.id);
            out.push(message.clone());
        }

        if !fetched_ids.is_empty() {
            for logged in inner.history.iter_mut() {
                if fetched_ids.binary_search(&logged.id).is_ok() {
                    logged.mark_read(recipient);
                }
            }
        }
        out
    }

    /// Record an evader sighting and raise the matching alert in one step.
    pub fn update_thief_position(&self, position: Vec2, observer: &AgentId) {
        let mut inner = self.lock();
        let now = inner.now();
        inner.knowledge.set(keys::THIEF_POSITION, position);
        inner.knowledge.set(
            keys::THIEF_LAST_SEEN,
            Sighting {
                position,
                observer: observer.clone(),
                seen_at: now,
            },
        );
        inner.alerts.push(Alert {
            kind: AlertKind::ThiefSighting {
                position,
                observer: observer.clone(),
            },
            severity: Severity::Warning,
            raised_at: now,
        });
    }

    pub fn post_alert(&self, kind: AlertKind, severity: Severity) {
        let mut inner = self.lock();
        let raised_at = inner.now();
        tracing::debug!(kind = %kind, ?severity, "alert raised");
        inner.alerts.push(Alert {
            kind,
            severity,
            raised_at,
        });
    }

    /// Queued alerts, oldest first; `clear` empties the queue in the same step.
    pub fn drain_alerts(&self, clear: bool) -> Vec<Alert> {
        let mut inner = self.lock();
        if clear {
            std::mem::take(&mut inner.alerts)
        } else {
            inner.alerts.clone()
        }
    }

    /// Drop queued messages older than `max_age_seconds`. The history log is left alone.
    pub fn age_out_messages(&self, max_age_seconds: f64) -> usize {
        let mut inner = self.lock();
        let now = inner.now();
        let before = inner.queue.len();
        inner
            .queue
            .retain(|m| now - m.sent_at < max_age_seconds);
        let removed = before - inner.queue.len();
        if removed > 0 {
            tracing::debug!(removed, "aged out queued messages");
        }
        removed
    }

    /// The most recent `limit` messages ever sent, oldest first.
    pub fn history(&self, limit: usize) -> Vec<Message> {
        let inner = self.lock();
        let skip = inner.history.len().saturating_sub(limit);
        inner.history.iter().skip(skip).cloned().collect()
    }

    pub fn pending_messages(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn pending_alerts(&self) -> usize {
        self.lock().alerts.len()
    }

    /// Add a discovered resource location unless it is already known.
    pub fn add_resource_location(&self, position: Vec2) -> bool {
        let mut inner = self.lock();
        let knowledge = &mut inner.knowledge;
        if knowledge.get(keys::RESOURCE_LOCATIONS).is_none() {
            knowledge.set(keys::RESOURCE_LOCATIONS, Vec::new());
        }
        let Some(locations) = knowledge.get_mut(keys::RESOURCE_LOCATIONS) else {
            return false;
        };
        if locations.contains(&position) {
            return false;
        }
        locations.push(position);
        true
    }

    pub fn remove_resource_location(&self, position: Vec2) -> bool {
        let mut inner = self.lock();
        let Some(locations) = inner.knowledge.get_mut(keys::RESOURCE_LOCATIONS) else {
            return false;
        };
        let before = locations.len();
        locations.retain(|p| *p != position);
        locations.len() != before
    }

    /// Back to the initial knowledge values with empty queues, alerts and history.
    pub fn reset(&self) {
        let mut inner = self.lock();
        *inner = Inner::new();
    }
}
