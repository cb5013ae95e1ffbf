//! Deadline-bounded completion calls.
//!
//! The request runs on its own task and reports back through a one-shot
//! channel. When the deadline passes first the task is left running; its late
//! reply finds the receiver gone and is dropped.

use actix_rt::time::timeout;
use futures::channel::oneshot;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::completion::{CompletionError, CompletionService};

/// Why a timed call produced no text
#[derive(Debug)]
pub enum CallFailure {
    TimedOut(Duration),
    Service(CompletionError),
}

pub struct TimedCompletion {
    service: Arc<dyn CompletionService>,
    limit: Duration,
    generation: u64,
}

impl TimedCompletion {
    pub fn new(service: Arc<dyn CompletionService>, limit: Duration) -> Self {
        TimedCompletion { service, limit, generation: 0 }
    }

    /// Number of calls issued so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask for a completion, waiting at most the configured limit
    pub async fn call(&mut self, prompt: String, max_tokens: u32) -> Result<String, CallFailure> {
        self.generation += 1;
        let generation = self.generation;

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        actix_rt::spawn(async move {
            let reply = service.complete(&prompt, max_tokens).await;
            if tx.send(reply).is_err() {
                debug!("Discarding late completion from call #{}", generation);
            }
        });

        match timeout(self.limit, rx).await {
            Ok(Ok(reply)) => reply.map_err(CallFailure::Service),
            Ok(Err(_)) => Err(CallFailure::Service(CompletionError::WorkerLost)),
            Err(_) => {
                warn!("Completion call #{} timed out after {:?}", generation, self.limit);
                Err(CallFailure::TimedOut(self.limit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Sleepy {
        delay: Duration,
        finished: AtomicUsize,
    }

    #[async_trait]
    impl CompletionService for Sleepy {
        async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
            actix_rt::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(prompt.to_uppercase())
        }
    }

    #[actix_rt::test]
    async fn fast_reply_is_returned() {
        let service = Arc::new(Sleepy { delay: Duration::ZERO, finished: AtomicUsize::new(0) });
        let mut timed = TimedCompletion::new(service, Duration::from_millis(500));
        let reply = timed.call("e4".to_string(), 10).await.unwrap();
        assert_eq!(reply, "E4");
        assert_eq!(timed.generation(), 1);
    }

    #[actix_rt::test]
    async fn slow_reply_times_out_and_is_discarded() {
        let service = Arc::new(Sleepy {
            delay: Duration::from_millis(80),
            finished: AtomicUsize::new(0),
        });
        let mut timed = TimedCompletion::new(service.clone(), Duration::from_millis(10));

        let result = timed.call("e4".to_string(), 10).await;
        assert!(matches!(result, Err(CallFailure::TimedOut(_))));
        assert_eq!(service.finished.load(Ordering::SeqCst), 0);

        // The abandoned worker still finishes, with nobody listening
        actix_rt::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(service.finished.load(Ordering::SeqCst), 1);
    }

    #[actix_rt::test]
    async fn generation_counts_every_call() {
        let service = Arc::new(Sleepy { delay: Duration::ZERO, finished: AtomicUsize::new(0) });
        let mut timed = TimedCompletion::new(service, Duration::from_millis(500));
        for _ in 0..3 {
            timed.call(String::new(), 10).await.unwrap();
        }
        assert_eq!(timed.generation(), 3);
    }
}
