//! Loading events.
//!
//! [`LoadingBus`] is the publish side: the HTTP client starts and ends one
//! load per call. [`LoadingStack`] and [`LoadingOverlay`] are the consuming
//! side, fed from a bus subscription.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Title shown when the active load does not set one.
pub const DEFAULT_TITLE: &str = "conectando";
/// Message shown when the active load does not set one.
pub const DEFAULT_MESSAGE: &str =
    "Estamos sincronizando seus dados com o ProConect. Isso leva apenas alguns instantes.";
/// How long the overlay lingers after the last load ends.
pub const HIDE_DELAY: Duration = Duration::from_millis(200);

const CHANNEL_CAPACITY: usize = 256;

/// Identifier of one in-flight load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadingId(String);

impl LoadingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to show while a load runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingDescriptor {
    /// Caller-chosen id; generated when absent.
    pub id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    /// Free-form tag of what is loading (e.g. `GET /api/anuncios`).
    pub context: Option<String>,
}

impl LoadingDescriptor {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: Some(title.into()), message: Some(message.into()), ..Self::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// A started load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingEntry {
    pub id: LoadingId,
    pub title: Option<String>,
    pub message: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingEvent {
    Start(LoadingEntry),
    End(LoadingId),
}

/// Cloneable publisher of loading events.
///
/// The bus also keeps the set of loads that have started and not ended, so a
/// subscriber that lagged can resync from [`LoadingBus::active`].
#[derive(Debug, Clone)]
pub struct LoadingBus {
    sender: broadcast::Sender<LoadingEvent>,
    counter: Arc<AtomicU64>,
    active: Arc<Mutex<LoadingStack>>,
}

impl Default for LoadingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            counter: Arc::new(AtomicU64::new(0)),
            active: Arc::new(Mutex::new(LoadingStack::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoadingEvent> {
        self.sender.subscribe()
    }

    /// Publish a start event and return the id to end it with.
    pub fn start(&self, descriptor: LoadingDescriptor) -> LoadingId {
        let id = match descriptor.id {
            Some(id) => LoadingId(id),
            None => self.next_id(),
        };
        let entry = LoadingEntry {
            id: id.clone(),
            title: descriptor.title,
            message: descriptor.message,
            context: descriptor.context,
        };
        self.active.lock().show(entry.clone());
        // No subscribers is fine
        let _ = self.sender.send(LoadingEvent::Start(entry));
        id
    }

    pub fn end(&self, id: &LoadingId) {
        self.active.lock().hide(id);
        let _ = self.sender.send(LoadingEvent::End(id.clone()));
    }

    /// Loads started and not yet ended, oldest first.
    pub fn active(&self) -> LoadingStack {
        self.active.lock().clone()
    }

    /// Start a load that ends when the guard drops.
    pub fn guard(&self, descriptor: LoadingDescriptor) -> LoadingGuard {
        let id = self.start(descriptor);
        LoadingGuard { bus: self.clone(), id }
    }

    fn next_id(&self) -> LoadingId {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let millis = chrono::Utc::now().timestamp_millis();
        LoadingId(format!("loading-{millis}-{seq}"))
    }
}

/// Ends its load on drop, including on early return or panic unwinding.
#[derive(Debug)]
pub struct LoadingGuard {
    bus: LoadingBus,
    id: LoadingId,
}

impl LoadingGuard {
    pub fn id(&self) -> &LoadingId {
        &self.id
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.bus.end(&self.id);
    }
}

/// Ordered set of active loads; the last started is on top.
#[derive(Debug, Clone, Default)]
pub struct LoadingStack {
    entries: Vec<LoadingEntry>,
}

impl LoadingStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &LoadingEvent) {
        match event {
            LoadingEvent::Start(entry) => self.show(entry.clone()),
            LoadingEvent::End(id) => self.hide(id),
        }
    }

    /// Push `entry`, replacing any entry with the same id.
    pub fn show(&mut self, entry: LoadingEntry) {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.push(entry);
    }

    pub fn hide(&mut self, id: &LoadingId) {
        self.entries.retain(|e| &e.id != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_loading(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn active(&self) -> Option<&LoadingEntry> {
        self.entries.last()
    }
}

/// Visibility and text of the loading overlay.
#[derive(Debug, Clone, Default)]
pub struct LoadingOverlay {
    stack: LoadingStack,
    emptied_at: Option<Instant>,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self) -> &LoadingStack {
        &self.stack
    }

    pub fn apply(&mut self, event: &LoadingEvent, now: Instant) {
        let was_loading = self.stack.is_loading();
        self.stack.apply(event);
        if self.stack.is_loading() {
            self.emptied_at = None;
        } else if was_loading {
            self.emptied_at = Some(now);
        }
    }

    /// Replace the stack with `bus`'s active loads.
    pub fn resync(&mut self, bus: &LoadingBus, now: Instant) {
        self.replace_stack(bus.active(), now);
    }

    fn replace_stack(&mut self, stack: LoadingStack, now: Instant) {
        let was_loading = self.stack.is_loading();
        self.stack = stack;
        if self.stack.is_loading() {
            self.emptied_at = None;
        } else if was_loading {
            self.emptied_at = Some(now);
        }
    }

    /// Apply every event already queued on `receiver`, resyncing from `bus`
    /// when events were dropped.
    pub fn drain(
        &mut self,
        bus: &LoadingBus,
        receiver: &mut broadcast::Receiver<LoadingEvent>,
        now: Instant,
    ) {
        loop {
            match receiver.try_recv() {
                Ok(event) => self.apply(&event, now),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Loading overlay lagged behind the bus, resyncing");
                    self.resync(bus, now);
                },
                Err(_) => break,
            }
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        if self.stack.is_loading() {
            return true;
        }
        self.emptied_at.is_some_and(|at| now.saturating_duration_since(at) < HIDE_DELAY)
    }

    pub fn title(&self) -> &str {
        self.stack.active().and_then(|e| e.title.as_deref()).unwrap_or(DEFAULT_TITLE)
    }

    pub fn message(&self) -> &str {
        self.stack.active().and_then(|e| e.message.as_deref()).unwrap_or(DEFAULT_MESSAGE)
    }

    /// `processos ativos` counter: never below one, two digits.
    pub fn display_count(&self) -> String {
        format!("{:02}", self.stack.count().max(1))
    }

    /// Keep a shared overlay in sync with `bus` on a background task.
    ///
    /// The task stops when every bus handle has been dropped.
    pub fn follow(bus: &LoadingBus) -> (Arc<Mutex<Self>>, JoinHandle<()>) {
        let overlay = Arc::new(Mutex::new(Self::new()));
        let mut receiver = bus.subscribe();
        // Shares the active set only, so it does not keep the channel open
        let active = Arc::clone(&bus.active);
        let shared = Arc::clone(&overlay);
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => shared.lock().apply(&event, Instant::now()),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Loading overlay lagged behind the bus, resyncing");
                        let snapshot = active.lock().clone();
                        shared.lock().replace_stack(snapshot, Instant::now());
                    },
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        (overlay, handle)
    }
}
