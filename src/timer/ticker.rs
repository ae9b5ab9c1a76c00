use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the UI loop waits for input before redrawing, in milliseconds
pub const UI_POLL_MS: u64 = 250;

/// Period of the timer clock
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Get the UI poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(UI_POLL_MS)
}

/// The only message the tick source ever sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMessage {
    Tick,
}

struct Worker {
    // Dropping the sender wakes the thread and ends it
    stop_tx: Sender<()>,
    ticks: Receiver<TickMessage>,
    handle: JoinHandle<()>,
}

/// Owned background clock. Runs only between `start` and `stop`.
pub struct Ticker {
    period: Duration,
    worker: Option<Worker>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, worker: None }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let (tick_tx, ticks) = unbounded();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let clock = crossbeam_channel::tick(self.period);

        let handle = thread::spawn(move || loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(clock) -> _ => {
                    if tick_tx.send(TickMessage::Tick).is_err() {
                        break;
                    }
                }
            }
        });

        tracing::debug!(period_ms = self.period.as_millis() as u64, "ticker started");
        self.worker = Some(Worker { stop_tx, ticks, handle });
    }

    /// Stop the thread; undelivered ticks are discarded
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            drop(worker.stop_tx);
            drop(worker.ticks);
            if worker.handle.join().is_err() {
                tracing::warn!("ticker thread panicked");
            }
            tracing::debug!("ticker stopped");
        }
    }

    /// Start or stop to match the timer state
    pub fn reconcile(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Collect ticks that arrived since the last call
    pub fn drain(&self) -> usize {
        match &self.worker {
            Some(worker) => worker.ticks.try_iter().count(),
            None => 0,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_duration() {
        assert_eq!(poll_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_ticker_delivers_ticks_while_running() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        assert!(!ticker.is_running());
        assert_eq!(ticker.drain(), 0);

        ticker.start();
        assert!(ticker.is_running());
        thread::sleep(Duration::from_millis(80));
        assert!(ticker.drain() >= 2);

        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.drain(), 0);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.reconcile(true);
        ticker.reconcile(true);
        assert!(ticker.is_running());
        ticker.reconcile(false);
        ticker.reconcile(false);
        assert!(!ticker.is_running());
    }
}
