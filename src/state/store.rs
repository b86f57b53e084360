//! Shared reactive form store
//!
//! One `Store` is created per form session and cloned into every widget.
//! Clones share the same state (`Rc<RefCell<..>>`); all access happens on the
//! UI task, so no locking is involved.
//!
//! Every mutation notifies all subscribers synchronously, in registration
//! order, with a full [`FormSnapshot`]. The internal borrow is released before
//! callbacks run, so a callback may read the store or drop its own
//! [`Subscription`]. A callback that writes to the store starts a nested
//! notification; the outer one then stops so nobody is handed an older
//! snapshot afterwards.

use super::form_data::{is_valid, FieldId, FormData, FormErrors, FormSnapshot, SubmissionState};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn(&FormSnapshot)>;

struct StoreInner {
    state: FormSnapshot,
    subscribers: BTreeMap<u64, Callback>,
    next_subscriber_id: u64,
    /// Depth of the notification cycle currently running
    notifying: usize,
    /// Bumped by every mutation
    version: u64,
}

/// Handle to the shared form state
#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<StoreInner>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: FormSnapshot::default(),
                subscribers: BTreeMap::new(),
                next_subscriber_id: 0,
                notifying: 0,
                version: 0,
            })),
        }
    }

    pub fn form_data(&self) -> FormData {
        self.inner.borrow().state.data.clone()
    }

    #[allow(dead_code)]
    pub fn form_errors(&self) -> FormErrors {
        self.inner.borrow().state.errors.clone()
    }

    pub fn submission(&self) -> SubmissionState {
        self.inner.borrow().state.submission.clone()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.borrow().state.clone()
    }

    /// Current value of one field
    pub fn value(&self, field: FieldId) -> String {
        self.inner.borrow().state.data.get(field).to_string()
    }

    /// Current error of one field (empty = none)
    pub fn error(&self, field: FieldId) -> String {
        self.inner.borrow().state.errors.get(field).to_string()
    }

    /// Derived validity, recomputed on every call
    pub fn is_valid(&self) -> bool {
        let inner = self.inner.borrow();
        is_valid(&inner.state.data, &inner.state.errors)
    }

    /// Replace one field value. Does not validate.
    pub fn set_field(&self, field: FieldId, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(field = field.key(), len = value.len(), "set_field");
        self.mutate(|state| state.data.set(field, value));
    }

    /// Replace one field error (empty clears it)
    pub fn set_field_error(&self, field: FieldId, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(field = field.key(), error = %message, "set_field_error");
        self.mutate(|state| state.errors.set(field, message));
    }

    /// Replace the submission state in a single notification
    pub fn set_submission(&self, submission: SubmissionState) {
        tracing::debug!(?submission, "set_submission");
        self.mutate(|state| state.submission = submission);
    }

    /// Restore all data, errors and flags to defaults in one notification
    pub fn reset(&self) {
        tracing::debug!("reset store");
        self.mutate(|state| *state = FormSnapshot::default());
    }

    /// Register a callback invoked after every change.
    ///
    /// The callback stays registered until the returned guard is dropped or
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FormSnapshot) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.insert(id, Rc::new(callback));
        tracing::trace!(id, "subscribe");
        Subscription {
            store: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn mutate(&self, apply: impl FnOnce(&mut FormSnapshot)) {
        let (snapshot, version, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying > 0 {
                tracing::warn!("store mutated from inside a subscriber callback");
            }
            apply(&mut inner.state);
            inner.version += 1;
            let callbacks: Vec<(u64, Callback)> = inner
                .subscribers
                .iter()
                .map(|(id, cb)| (*id, Rc::clone(cb)))
                .collect();
            inner.notifying += 1;
            (inner.state.clone(), inner.version, callbacks)
        };

        for (id, callback) in callbacks {
            let (live, stale) = {
                let inner = self.inner.borrow();
                (inner.subscribers.contains_key(&id), inner.version != version)
            };
            // A nested mutation already delivered a newer snapshot to everyone
            if stale {
                break;
            }
            // Skip callbacks unsubscribed earlier in this cycle
            if live {
                callback(&snapshot);
            }
        }

        self.inner.borrow_mut().notifying -= 1;
    }
}

/// Guard for a store subscription; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<RefCell<StoreInner>>,
    id: Option<u64>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    /// Remove the callback now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        match (self.id, self.store.upgrade()) {
            (Some(id), Some(inner)) => inner.borrow().subscribers.contains_key(&id),
            _ => false,
        }
    }

    fn release(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.store.upgrade()) {
            // try_borrow_mut: the store may already be borrowed if a guard is
            // dropped from inside `mutate`'s apply closure, which never happens
            // in practice but must not panic.
            match inner.try_borrow_mut() {
                Ok(mut inner) => {
                    inner.subscribers.remove(&id);
                    tracing::trace!(id, "unsubscribe");
                }
                Err(_) => tracing::warn!(id, "store busy, subscription not removed"),
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn recorder(store: &Store) -> (Rc<RefCell<Vec<FormSnapshot>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |snap| sink.borrow_mut().push(snap.clone()));
        (seen, sub)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = Store::new();
        assert_eq!(store.snapshot(), FormSnapshot::default());
        assert!(!store.is_valid());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_set_field_notifies_with_full_snapshot() {
        let store = Store::new();
        let (seen, _sub) = recorder(&store);

        store.set_field(FieldId::Name, "Ada");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].data.name, "Ada");
        assert_eq!(seen[0].data.email, "");
    }

    #[test]
    fn test_set_field_does_not_validate() {
        let store = Store::new();
        store.set_field(FieldId::Email, "not-an-email");
        assert_eq!(store.error(FieldId::Email), "");
    }

    #[test]
    fn test_set_field_error_notifies() {
        let store = Store::new();
        let (seen, _sub) = recorder(&store);

        store.set_field_error(FieldId::Email, "bad");

        assert_eq!(store.error(FieldId::Email), "bad");
        assert_eq!(seen.borrow()[0].errors.email, "bad");
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new();
        let other = store.clone();
        other.set_field(FieldId::Country, "de");
        assert_eq!(store.value(FieldId::Country), "de");
    }

    #[test]
    fn test_multiple_subscribers_in_registration_order() {
        let store = Store::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&order);
        let b = Rc::clone(&order);
        let _first = store.subscribe(move |_| a.borrow_mut().push("first"));
        let _second = store.subscribe(move |_| b.borrow_mut().push("second"));

        store.set_field(FieldId::Name, "x");

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_no_notification_after_unsubscribe() {
        let store = Store::new();
        let (seen, sub) = recorder(&store);

        store.set_field(FieldId::Name, "a");
        sub.unsubscribe();
        store.set_field(FieldId::Name, "ab");

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = Store::new();
        let calls = Rc::new(Cell::new(0));
        {
            let calls = Rc::clone(&calls);
            let _sub = store.subscribe(move |_| calls.set(calls.get() + 1));
            store.set_field(FieldId::Name, "a");
        }
        store.set_field(FieldId::Name, "b");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_notification_skips_later_callback() {
        let store = Store::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let second_calls = Rc::new(Cell::new(0));

        let killer_slot = Rc::clone(&slot);
        let _killer = store.subscribe(move |_| {
            killer_slot.borrow_mut().take();
        });
        let counter = Rc::clone(&second_calls);
        *slot.borrow_mut() = Some(store.subscribe(move |_| counter.set(counter.get() + 1)));

        store.set_field(FieldId::Name, "x");

        assert_eq!(second_calls.get(), 0);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_callback_can_read_store() {
        let store = Store::new();
        let reader = store.clone();
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&seen);
        let _sub = store.subscribe(move |_| *sink.borrow_mut() = reader.value(FieldId::Name));

        store.set_field(FieldId::Name, "Grace");

        assert_eq!(*seen.borrow(), "Grace");
    }

    #[test]
    fn test_reset_restores_defaults_in_one_notification() {
        let store = Store::new();
        store.set_field(FieldId::Name, "Ada");
        store.set_field_error(FieldId::Email, "bad");
        store.set_submission(SubmissionState::Submitting);
        let (seen, _sub) = recorder(&store);

        store.reset();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(store.snapshot(), FormSnapshot::default());
    }

    #[test]
    fn test_mutation_inside_callback_notifies_everyone() {
        let store = Store::new();
        let writer = store.clone();
        let _validator = store.subscribe(move |snap| {
            if snap.data.name == "A" && snap.errors.name.is_empty() {
                writer.set_field_error(FieldId::Name, "too short");
            }
        });
        let (first, _first_sub) = recorder(&store);
        let (second, _second_sub) = recorder(&store);

        store.set_field(FieldId::Name, "A");

        assert_eq!(store.value(FieldId::Name), "A");
        assert_eq!(store.error(FieldId::Name), "too short");
        for seen in [first, second] {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0], store.snapshot());
        }
    }

    #[test]
    fn test_subscription_outlives_store() {
        let store = Store::new();
        let sub = store.subscribe(|_| {});
        drop(store);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_is_valid_tracks_state() {
        let store = Store::new();
        store.set_field(FieldId::Name, "Ada");
        store.set_field(FieldId::Email, "ada@example.com");
        store.set_field(FieldId::Country, "uk");
        store.set_field(FieldId::Message, "Hello there, world");
        assert!(store.is_valid());

        store.set_field_error(FieldId::Message, "nope");
        assert!(!store.is_valid());
    }
}
