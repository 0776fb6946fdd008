//! crates/logging/src/daemons.rs
//! Background flush and retention threads.
//!
//! Both threads hold only a weak reference to the engine, so dropping the
//! last [`Logger`](crate::Logger) lets them wind down on their next wakeup.
//! Closing the shutdown channel stops them immediately.

use std::io::Write;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, select, tick};
use logging_sink::OrigStderr;

use crate::dispatcher::Inner;

pub(crate) struct Daemons {
    shutdown: Sender<()>,
    threads: Vec<JoinHandle<()>>,
}

impl Daemons {
    /// Starts the flush daemon, and the retention daemon when `retention`
    /// carries its notification channel and interval.
    pub(crate) fn spawn(
        inner: &Arc<Inner>,
        flush_interval: Duration,
        retention: Option<(Receiver<()>, Duration)>,
    ) -> Self {
        let (shutdown, stop) = bounded::<()>(0);
        let mut threads = Vec::with_capacity(2);

        let weak = Arc::downgrade(inner);
        let flush_stop = stop.clone();
        threads.extend(spawn_named("log-flush", move || {
            flush_loop(&weak, flush_interval, &flush_stop);
        }));

        if let Some((notify, interval)) = retention {
            let weak = Arc::downgrade(inner);
            threads.extend(spawn_named("log-retention", move || {
                retention_loop(&weak, interval, &notify, &stop);
            }));
        }

        Self { shutdown, threads }
    }

    /// Signals every daemon and waits for it to exit.
    pub(crate) fn stop(self) {
        drop(self.shutdown);
        for thread in self.threads {
            let _ = thread.join();
        }
    }
}

fn spawn_named(name: &str, body: impl FnOnce() + Send + 'static) -> Option<JoinHandle<()>> {
    match thread::Builder::new().name(name.to_owned()).spawn(body) {
        Ok(handle) => Some(handle),
        Err(error) => {
            let _ = writeln!(OrigStderr, "log: unable to start {name} daemon: {error}");
            None
        }
    }
}

fn flush_loop(inner: &Weak<Inner>, interval: Duration, stop: &Receiver<()>) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                let Some(inner) = inner.upgrade() else { return };
                let _ = inner.flush();
            }
            recv(stop) -> _ => return,
        }
    }
}

fn retention_loop(
    inner: &Weak<Inner>,
    interval: Duration,
    notify: &Receiver<()>,
    stop: &Receiver<()>,
) {
    let Some(engine) = inner.upgrade() else { return };
    engine.retention_pass();
    drop(engine);

    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {}
            recv(notify) -> event => {
                if event.is_err() {
                    return;
                }
            }
            recv(stop) -> _ => return,
        }
        let Some(engine) = inner.upgrade() else { return };
        engine.retention_pass();
    }
}
