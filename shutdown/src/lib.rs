//  Copyright 2026. The Ringnote Developers
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! A convenient shutdown signal.
//!
//! [`Shutdown`] is the trigger half, held by whatever owns the process lifecycle (typically a
//! `main` function). [`ShutdownSignal`] is the listener half, cheaply cloned and handed to every
//! long-running task (the blockchain engine's event loop, the mempool sweep, any RPC-independent
//! background worker) that needs to know when to stop. Triggering is idempotent and dropping the
//! `Shutdown` without triggering it also signals shutdown, so a panicking owner can't leave
//! listeners hanging forever.

use std::{
    future::Future,
    pin::Pin,
    sync::atomic::{AtomicBool, Ordering},
    sync::Arc,
    task::{Context, Poll},
};

use futures::{
    channel::oneshot,
    future::{Fuse, FutureExt},
};

/// The trigger half of a shutdown signal.
///
/// Dropping a `Shutdown` that has not been triggered still triggers it, so callers don't need a
/// `finally`-style guard to make sure listeners wake up.
pub struct Shutdown {
    trigger: Option<oneshot::Sender<()>>,
    signal: futures::future::Shared<Fuse<oneshot::Receiver<()>>>,
    is_triggered: Arc<AtomicBool>,
}

impl Shutdown {
    /// Create a new shutdown trigger/signal pair.
    pub fn new() -> Self {
        let (trigger, receiver) = oneshot::channel();
        Self {
            trigger: Some(trigger),
            signal: receiver.fuse().shared(),
            is_triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Trigger the shutdown signal, waking every [`ShutdownSignal`] derived from this instance.
    /// Returns `true` if this call triggered it, `false` if it had already been triggered.
    pub fn trigger(&mut self) -> bool {
        if self.is_triggered.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(trigger) = self.trigger.take() {
            let _ = trigger.send(());
        }
        true
    }

    /// `true` once [`trigger`](Self::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        self.is_triggered.load(Ordering::SeqCst)
    }

    /// Obtain a listener for this shutdown. Signals may be cloned freely; all of them resolve
    /// together when the owning `Shutdown` is triggered or dropped.
    pub fn to_signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            signal: self.signal.clone(),
            is_triggered: self.is_triggered.clone(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Shutdown {
    fn drop(&mut self) {
        self.trigger();
    }
}

/// A cloneable listener for a [`Shutdown`] signal.
///
/// `ShutdownSignal` implements [`Future`], resolving once the paired [`Shutdown`] has been
/// triggered (or dropped). It can be polled directly or used in a `select!` alongside other work.
#[derive(Clone)]
pub struct ShutdownSignal {
    signal: futures::future::Shared<Fuse<oneshot::Receiver<()>>>,
    is_triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// `true` if the signal has already fired.
    pub fn is_triggered(&self) -> bool {
        self.is_triggered.load(Ordering::SeqCst)
    }

    /// Await the shutdown signal.
    pub async fn wait(self) {
        self.await
    }
}

impl Future for ShutdownSignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.signal).poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn trigger_wakes_signal() {
        let mut shutdown = Shutdown::new();
        let signal = shutdown.to_signal();
        assert!(!signal.is_triggered());
        assert!(shutdown.trigger());
        signal.wait().await;
    }

    #[tokio::test]
    async fn dropping_shutdown_triggers_signal() {
        let shutdown = Shutdown::new();
        let signal = shutdown.to_signal();
        drop(shutdown);
        signal.wait().await;
    }

    #[tokio::test]
    async fn signal_can_be_cloned_and_all_clones_resolve() {
        let mut shutdown = Shutdown::new();
        let a = shutdown.to_signal();
        let b = a.clone();
        shutdown.trigger();
        a.wait().await;
        b.wait().await;
    }

    #[test]
    fn second_trigger_is_a_no_op() {
        let mut shutdown = Shutdown::new();
        assert!(shutdown.trigger());
        assert!(!shutdown.trigger());
    }
}
