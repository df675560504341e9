// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Change notification for playback state.
//!
//! The [`ChangeBroadcaster`] keeps the set of registered [`Listener`]s and
//! hands each of them a chance to react after every engine mutation.
//! Listeners receive no arguments; they pull the latest snapshot themselves.
//!
//! Delivery iterates a copy of the listener list taken when the pass starts,
//! with the internal lock released, so a listener may subscribe or
//! unsubscribe (itself or others) from inside its own callback.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tracing::trace;

/// Receives a callback whenever playback state has changed.
pub trait Listener: Send + Sync {
    fn on_change(&self);
}

impl<F> Listener for F
where
    F: Fn() + Send + Sync,
{
    fn on_change(&self) {
        self()
    }
}

/// Handle identifying one registration, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Registration = (SubscriptionId, Arc<dyn Listener>);

#[derive(Default)]
pub struct ChangeBroadcaster {
    listeners: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
}

impl ChangeBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Subscribing the same listener twice delivers
    /// every notification to it twice.
    pub fn subscribe(&self, listener: Arc<dyn Listener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, listener));
        trace!(?id, "listener subscribed");
        id
    }

    /// Removes a registration, returning `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        let removed = listeners.len() != before;
        if removed {
            trace!(?id, "listener unsubscribed");
        }
        removed
    }

    /// Delivers one notification to every currently registered listener.
    pub fn notify_all(&self) {
        let pass: Vec<Registration> = self.lock().clone();

        for (id, listener) in pass {
            // Skip anything unsubscribed earlier in this pass.
            if !self.is_registered(id) {
                continue;
            }
            listener.on_change();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn is_registered(&self, id: SubscriptionId) -> bool {
        self.lock().iter().any(|(registered, _)| *registered == id)
    }

    // A listener that panicked mid-pass never held the lock, so the list is
    // still consistent after poisoning.
    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
