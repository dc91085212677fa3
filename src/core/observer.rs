//! Subscriber lists with stable handles
//!
//! Each subscription gets a `SubscriptionId` when it is added, and that id
//! is what `unsubscribe` takes. Callbacks run synchronously, in subscription
//! order, on the thread driving the engine update.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared by every list, so handles from different lists never collide.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Handle returned by `subscribe`, valid until unsubscribed or cleared.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Ordered list of callbacks for one kind of event.
pub struct Observers<E> {
    entries: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}
