//! Price monitoring and updates

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{DisplayState, PriceFeed, PriceSnapshot, FETCH_ERROR_MESSAGE, REFRESH_INTERVAL};

#[derive(Debug, Clone, Copy)]
enum PollTrigger {
    Initial,
    Scheduled,
    Manual,
}

/// Drives when polls happen and folds their outcomes into the display state.
///
/// The recurring timer is armed by [`PriceMonitor::start`] and disarmed by
/// [`PriceMonitor::stop`] or when the monitor is dropped. Stopping also aborts
/// polls still in flight, so nothing writes the state after teardown.
///
/// Every poll carries an issue ticket. A result is only applied if no later-issued
/// poll has been applied already, so a slow response never overwrites a newer one.
///
/// `start` and `refresh_now` spawn tasks and must be called from within a tokio runtime.
pub struct PriceMonitor {
    poller: Arc<Poller>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct Poller {
    feed: Arc<dyn PriceFeed>,
    state: watch::Sender<DisplayState>,
    in_flight: Mutex<JoinSet<()>>,
    issued: AtomicU64,
    applied: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drop finished poll tasks from the set, logging any that panicked.
fn reap_finished(in_flight: &mut JoinSet<()>) -> usize {
    let mut panicked = 0;
    while let Some(joined) = in_flight.try_join_next() {
        if let Err(e) = joined {
            if e.is_panic() {
                warn!("⚠️ Poll task panicked: {}", e);
                panicked += 1;
            }
        }
    }
    panicked
}

impl PriceMonitor {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        let (state, _) = watch::channel(DisplayState::Loading);
        Self {
            poller: Arc::new(Poller {
                feed,
                state,
                in_flight: Mutex::new(JoinSet::new()),
                issued: AtomicU64::new(0),
                applied: AtomicU64::new(0),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Create a monitor and start it right away.
    pub fn spawn(feed: Arc<dyn PriceFeed>) -> Self {
        let monitor = Self::new(feed);
        monitor.start();
        monitor
    }

    /// Poll now and then every [`REFRESH_INTERVAL`] until stopped.
    pub fn start(&self) {
        let mut timer = lock(&self.timer);
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Price monitor already running, ignoring start");
            return;
        }

        info!("🚀 Starting price monitor (refresh every {}s)", REFRESH_INTERVAL.as_secs());
        self.poller.issue(PollTrigger::Initial);

        let poller = Arc::clone(&self.poller);
        let first_tick = Instant::now() + REFRESH_INTERVAL;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, REFRESH_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                poller.issue(PollTrigger::Scheduled);
            }
        }));
    }

    /// Disarm the timer and cancel polls in flight. Safe to call repeatedly.
    pub fn stop(&self) {
        let timer = lock(&self.timer).take();

        let mut in_flight = lock(&self.poller.in_flight);
        reap_finished(&mut in_flight);
        let cancelled = in_flight.len();
        in_flight.abort_all();

        match timer {
            Some(handle) => {
                handle.abort();
                info!("🛑 Price monitor stopped ({} poll(s) cancelled)", cancelled);
            }
            None if cancelled > 0 => {
                info!("🛑 Cancelled {} manual poll(s)", cancelled);
            }
            None => debug!("Price monitor not running, nothing to stop"),
        }
    }

    /// Issue an out-of-band poll.
    pub fn refresh_now(&self) {
        self.poller.issue(PollTrigger::Manual);
    }

    pub fn state(&self) -> DisplayState {
        self.poller.state.borrow().clone()
    }

    /// Receiver that is notified whenever the display state changes.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.poller.state.subscribe()
    }

    pub fn polls_issued(&self) -> u64 {
        self.poller.issued.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        lock(&self.timer)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for PriceMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Poller {
    fn issue(self: &Arc<Self>, trigger: PollTrigger) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Issuing poll #{} ({:?})", ticket, trigger);

        let poller = Arc::clone(self);
        let mut in_flight = lock(&self.in_flight);
        reap_finished(&mut in_flight);
        in_flight.spawn(async move {
            poller.poll(ticket).await;
        });
    }

    async fn poll(&self, ticket: u64) {
        let next = match self.feed.fetch_quote().await {
            Ok(quote) => {
                let snapshot = PriceSnapshot::observed_now(quote);
                info!(
                    "📈 Poll #{}: ${:.2} ({:+.2}% 24h)",
                    ticket,
                    snapshot.price(),
                    snapshot.change_24h()
                );
                DisplayState::Ready(snapshot)
            }
            Err(e) => {
                warn!("⚠️ Poll #{} failed: {}", ticket, e);
                DisplayState::Error(FETCH_ERROR_MESSAGE.to_string())
            }
        };
        self.apply(ticket, next);
    }

    fn apply(&self, ticket: u64, next: DisplayState) -> bool {
        self.state.send_if_modified(|state| {
            if ticket <= self.applied.load(Ordering::SeqCst) {
                debug!("Discarding stale result of poll #{}", ticket);
                return false;
            }
            self.applied.store(ticket, Ordering::SeqCst);
            *state = next;
            true
        })
    }
}
