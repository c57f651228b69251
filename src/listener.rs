//! One-to-many change notification.
//!
//! A [`Subject`] fans events out to registered listeners. The listener
//! chain is a persistent immutable join tree: adding or removing a
//! listener rebuilds the affected spine while firing always walks a
//! snapshot taken before dispatch, so concurrent registry mutation can
//! never corrupt an in-flight notification (it may or may not be
//! reflected in it).
//!
//! A secondary delayed channel defers delivery onto a
//! [`DispatchQueue`] worker and coalesces bursts: at most one flush is
//! pending at a time and it carries whichever event was stored last,
//! so intermediate events can be dropped by design.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

/// Receives events from a [`Subject`] it was registered with.
pub trait Listener<T>: Send + Sync {
    fn event_fired(&self, event: &T);
}

impl<T, F> Listener<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn event_fired(&self, event: &T) {
        self(event)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Zero, one, or many listeners joined into an immutable binary tree.
enum Chain<T> {
    One(Arc<dyn Listener<T>>),
    Join(Arc<(Chain<T>, Chain<T>)>),
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        match self {
            Self::One(listener) => Self::One(Arc::clone(listener)),
            Self::Join(pair) => Self::Join(Arc::clone(pair)),
        }
    }
}

impl<T> Chain<T> {
    fn fire(&self, event: &T) {
        match self {
            Self::One(listener) => listener.event_fired(event),
            Self::Join(pair) => {
                pair.0.fire(event);
                pair.1.fire(event);
            }
        }
    }

    fn add(chain: Option<Self>, listener: Arc<dyn Listener<T>>) -> Self {
        match chain {
            None => Self::One(listener),
            Some(existing) => Self::Join(Arc::new((existing, Self::One(listener)))),
        }
    }

    /// Removes every occurrence of `target` (by identity), rebuilding
    /// the join nodes on the path to it. `None` means the chain is
    /// now empty.
    fn remove(&self, target: &Arc<dyn Listener<T>>) -> Option<Self> {
        match self {
            Self::One(listener) => {
                if Arc::ptr_eq(listener, target) {
                    None
                } else {
                    Some(self.clone())
                }
            }
            Self::Join(pair) => match (pair.0.remove(target), pair.1.remove(target)) {
                (Some(a), Some(b)) => Some(Self::Join(Arc::new((a, b)))),
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            },
        }
    }
}

type Job = Box<dyn FnOnce() + Send>;

/// Handle on a single-threaded event-processing queue.
///
/// Jobs posted here run in order on one worker thread. Delayed
/// listener flushes are scheduled through a queue owned by whoever
/// owns the simulation session; the core never touches a process-wide
/// singleton.
#[derive(Clone)]
pub struct DispatchQueue {
    tx: Sender<Job>,
}

impl DispatchQueue {
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        thread::Builder::new()
            .name("event-dispatch".to_string())
            .spawn(move || {
                // The thread exits once every queue handle is dropped.
                while let Ok(job) = rx.recv() {
                    job();
                }
            })?;
        Ok(Self { tx })
    }

    pub fn post(&self, job: impl FnOnce() + Send + 'static) {
        let _ = self.tx.send(Box::new(job));
    }

    /// Blocks until every job posted before this call has run.
    pub fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        self.post(move || {
            let _ = tx.send(());
        });
        let _ = rx.recv();
    }
}

struct Delayed<T> {
    queue: DispatchQueue,
    chain: Chain<T>,
}

struct Inner<T> {
    immediate: Mutex<Option<Chain<T>>>,
    delayed: Mutex<Option<Delayed<T>>>,
    /// Whether a delayed flush is already scheduled but not yet run.
    pending: AtomicBool,
    /// Last event offered to the delayed channel before the flush.
    latest: Mutex<Option<T>>,
}

/// An observable subject; clones share one listener registry.
pub struct Subject<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Subject<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                immediate: Mutex::new(None),
                delayed: Mutex::new(None),
                pending: AtomicBool::new(false),
                latest: Mutex::new(None),
            }),
        }
    }

    /// Registers a listener. The same listener may be added more than
    /// once and will then be fired once per registration.
    pub fn add_listener(&self, listener: Arc<dyn Listener<T>>) {
        let mut chain = lock(&self.inner.immediate);
        *chain = Some(Chain::add(chain.take(), listener));
    }

    /// Registers a listener on the delayed channel, flushed through
    /// the given queue.
    pub fn add_delayed_listener(&self, queue: &DispatchQueue, listener: Arc<dyn Listener<T>>) {
        let mut delayed = lock(&self.inner.delayed);
        *delayed = Some(match delayed.take() {
            None => Delayed {
                queue: queue.clone(),
                chain: Chain::One(listener),
            },
            Some(existing) => Delayed {
                queue: existing.queue,
                chain: Chain::Join(Arc::new((existing.chain, Chain::One(listener)))),
            },
        });
    }

    /// Unregisters a listener, matched by identity.
    pub fn remove_listener(&self, listener: &Arc<dyn Listener<T>>) {
        let mut chain = lock(&self.inner.immediate);
        if let Some(existing) = chain.take() {
            *chain = existing.remove(listener);
        }
    }

    pub fn remove_all_listeners(&self) {
        *lock(&self.inner.immediate) = None;
    }

    /// Fires the immediate listeners on the calling thread and
    /// schedules at most one delayed flush carrying the latest event.
    pub fn notify(&self, event: T) {
        let snapshot = lock(&self.inner.immediate).clone();
        if let Some(chain) = snapshot {
            chain.fire(&event);
        }

        let queue = lock(&self.inner.delayed)
            .as_ref()
            .map(|delayed| delayed.queue.clone());
        let Some(queue) = queue else {
            return;
        };

        *lock(&self.inner.latest) = Some(event);
        if !self.inner.pending.swap(true, Ordering::SeqCst) {
            let inner = Arc::clone(&self.inner);
            queue.post(move || {
                inner.pending.store(false, Ordering::SeqCst);
                let event = lock(&inner.latest).take();
                let chain = lock(&inner.delayed)
                    .as_ref()
                    .map(|delayed| delayed.chain.clone());
                if let (Some(event), Some(chain)) = (event, chain) {
                    chain.fire(&event);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn recording_listener(log: Arc<Mutex<Vec<u32>>>) -> Arc<dyn Listener<u32>> {
        Arc::new(move |event: &u32| {
            lock(&log).push(*event);
        })
    }

    #[test]
    fn fires_every_registered_listener() {
        let subject = Subject::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recording_listener(Arc::clone(&log));
        let b = recording_listener(Arc::clone(&log));
        subject.add_listener(Arc::clone(&a));
        subject.add_listener(Arc::clone(&b));

        subject.notify(7);
        assert_eq!(*lock(&log), vec![7, 7]);
    }

    #[test]
    fn remove_first_middle_and_last() {
        for removed in 0..3 {
            let subject = Subject::new();
            let logs: Vec<_> = (0..3).map(|_| Arc::new(Mutex::new(Vec::new()))).collect();
            let listeners: Vec<_> = logs
                .iter()
                .map(|log| recording_listener(Arc::clone(log)))
                .collect();
            for listener in &listeners {
                subject.add_listener(Arc::clone(listener));
            }

            subject.remove_listener(&listeners[removed]);
            subject.notify(1);

            for (i, log) in logs.iter().enumerate() {
                let expected: Vec<u32> = if i == removed { vec![] } else { vec![1] };
                assert_eq!(*lock(log), expected, "listener {i}, removed {removed}");
            }
        }
    }

    #[test]
    fn remove_all_silences_the_subject() {
        let subject = Subject::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        subject.add_listener(recording_listener(Arc::clone(&log)));
        subject.remove_all_listeners();
        subject.notify(3);
        assert!(lock(&log).is_empty());
    }

    #[test]
    fn delayed_notifications_coalesce_to_the_latest_event() {
        let queue = DispatchQueue::new().unwrap();
        let subject = Subject::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        subject.add_delayed_listener(&queue, recording_listener(Arc::clone(&log)));

        // Park the worker so every notify below lands before the
        // flush job can run.
        let (release_tx, release_rx) = channel::<()>();
        queue.post(move || {
            let _ = release_rx.recv();
        });

        for event in 1..=5 {
            subject.notify(event);
        }
        release_tx.send(()).unwrap();
        queue.flush();

        assert_eq!(*lock(&log), vec![5]);
    }

    #[test]
    fn delayed_channel_delivers_again_after_a_flush() {
        let queue = DispatchQueue::new().unwrap();
        let subject = Subject::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        subject.add_delayed_listener(&queue, recording_listener(Arc::clone(&log)));

        subject.notify(1);
        queue.flush();
        subject.notify(2);
        queue.flush();

        assert_eq!(*lock(&log), vec![1, 2]);
    }
}
