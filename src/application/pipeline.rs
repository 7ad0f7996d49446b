//! Fetch pipeline publishing [`FetchState`] to any number of observers.
//!
//! A [`Pipeline`] binds one fetch operation and owns the state describing its
//! latest attempt. [`Pipeline::start`] announces `Pending`, runs the
//! operation on a background thread and announces the outcome. Observers get
//! a read-only [`Subscription`] that replays the current state and then every
//! later publication in order.
//!
//! Each start bumps a generation counter. An attempt that finishes after a
//! newer one was started, or after the pipeline was dropped, is discarded
//! instead of published.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::domain::{FetchError, FetchResult, FetchState};

/// Prefix of the names given to worker threads.
pub const FETCH_THREAD_PREFIX: &str = "fetch-";

type Operation<T> = dyn Fn() -> FetchResult<T> + Send + Sync;

struct Published<T> {
    state: FetchState<T>,
    generation: u64,
    closed: bool,
    subscribers: Vec<Sender<FetchState<T>>>,
}

impl<T: Clone> Published<T> {
    /// Replaces the state and fans it out while the lock is held, so every
    /// subscriber sees publications in the same total order.
    fn publish(&mut self, state: FetchState<T>) {
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
        self.state = state;
    }
}

type Shared<T> = Arc<Mutex<Published<T>>>;

fn lock<T>(shared: &Mutex<Published<T>>) -> MutexGuard<'_, Published<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owner of one fetch-state lifecycle.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tusers::application::Pipeline;
/// use tusers::domain::FetchState;
///
/// let pipeline = Pipeline::new("answer", || Ok(42));
/// let updates = pipeline.subscribe();
/// assert_eq!(updates.recv_timeout(Duration::from_secs(5)), Some(FetchState::Idle));
///
/// pipeline.start();
/// assert_eq!(updates.recv_timeout(Duration::from_secs(5)), Some(FetchState::Pending));
/// assert_eq!(updates.recv_timeout(Duration::from_secs(5)), Some(FetchState::Ok(42)));
/// ```
pub struct Pipeline<T> {
    name: String,
    operation: Arc<Operation<T>>,
    shared: Shared<T>,
}

impl<T> Pipeline<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an idle pipeline around `operation`.
    ///
    /// The operation may block; it always runs on a background thread.
    pub fn new<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn() -> FetchResult<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            operation: Arc::new(operation),
            shared: Arc::new(Mutex::new(Published {
                state: FetchState::Idle,
                generation: 0,
                closed: false,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts a new attempt without blocking the caller.
    ///
    /// `Pending` is published before this returns. Any attempt still in
    /// flight is superseded and its result will be dropped.
    pub fn start(&self) {
        // Workers are detached; a superseded one lives until its transport
        // call returns and then drops its result.
        self.launch();
    }

    /// Same as [`start`](Self::start). Previous data is not kept.
    pub fn retry(&self) {
        self.start();
    }

    /// Latest published state.
    pub fn current_state(&self) -> FetchState<T> {
        lock(&self.shared).state.clone()
    }

    /// Registers a new observer.
    ///
    /// The subscription first yields the state current at the time of the
    /// call, then every later publication.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        let mut published = lock(&self.shared);
        // Registration happens under the same lock as publication, so nothing
        // can slip in between the snapshot and the first live update.
        if tx.send(published.state.clone()).is_ok() {
            published.subscribers.push(tx);
        }
        Subscription { receiver: rx }
    }

    /// Starts an attempt and hands back the worker thread, if one was spawned.
    pub(crate) fn launch(&self) -> Option<JoinHandle<()>> {
        let generation = {
            let mut published = lock(&self.shared);
            published.generation += 1;
            published.publish(FetchState::Pending);
            published.generation
        };
        debug!("{}: attempt {} pending", self.name, generation);

        let shared = Arc::clone(&self.shared);
        let operation = Arc::clone(&self.operation);
        let name = self.name.clone();
        let spawned = thread::Builder::new()
            .name(format!("{}{}", FETCH_THREAD_PREFIX, self.name))
            .spawn(move || {
                let result = run_guarded(&*operation);
                complete(&shared, &name, generation, result);
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("{}: could not spawn fetch thread: {}", self.name, err);
                complete(
                    &self.shared,
                    &self.name,
                    generation,
                    Err(FetchError::Unrecognized(format!("Could not start request: {}", err))),
                );
                None
            }
        }
    }
}

impl<T> Drop for Pipeline<T> {
    fn drop(&mut self) {
        let mut published = lock(&self.shared);
        published.closed = true;
        published.subscribers.clear();
    }
}

fn run_guarded<T>(operation: &Operation<T>) -> FetchResult<T> {
    panic::catch_unwind(AssertUnwindSafe(operation))
        .unwrap_or_else(|payload| Err(FetchError::Unrecognized(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("Unexpected error: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("Unexpected error: {}", message)
    } else {
        "Unexpected error".to_string()
    }
}

fn complete<T: Clone>(shared: &Mutex<Published<T>>, name: &str, generation: u64, result: FetchResult<T>) {
    if let Err(err) = &result {
        warn!("{}: attempt {} failed: {}", name, generation, err);
    }

    let mut published = lock(shared);
    if published.closed {
        debug!("{}: attempt {} finished after teardown, dropped", name, generation);
        return;
    }
    if published.generation != generation {
        debug!(
            "{}: attempt {} superseded by {}, dropped",
            name, generation, published.generation
        );
        return;
    }

    let state = FetchState::from_result(result);
    debug!("{}: attempt {} {}", name, generation, state.label());
    published.publish(state);
}

/// Read-only view of a pipeline's publications.
///
/// Dropping it unsubscribes. Once the pipeline is dropped the subscription
/// yields whatever was already queued and then nothing.
pub struct Subscription<T> {
    receiver: Receiver<FetchState<T>>,
}

impl<T> Subscription<T> {
    /// Next queued publication, without waiting.
    pub fn try_next(&self) -> Option<FetchState<T>> {
        self.receiver.try_recv().ok()
    }

    /// Next publication, waiting up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchState<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(state) => Some(state),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// All queued publications, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = FetchState<T>> + '_ {
        self.receiver.try_iter()
    }
}
