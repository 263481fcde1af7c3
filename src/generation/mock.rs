use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::GenerationError;
use super::{Generator, clean_generation};

#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    EchoContext,
    Fail,
}

/// Scriptable generator that records its calls.
#[derive(Debug)]
pub struct MockGenerator {
    behavior: MockBehavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_context: Mutex<Option<String>>,
}

impl MockGenerator {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
            last_context: Mutex::new(None),
        }
    }

    /// Always answers `text`, cleaned the way a real model reply is.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Reply(text.into()))
    }

    /// Answers with the context it was given.
    pub fn echo() -> Self {
        Self::with_behavior(MockBehavior::EchoContext)
    }

    pub fn failing() -> Self {
        Self::with_behavior(MockBehavior::Fail)
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_context(&self) -> Option<String> {
        self.last_context.lock().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, _question: &str, context: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock() = Some(context.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(clean_generation(text)),
            MockBehavior::EchoContext => Ok(context.to_string()),
            MockBehavior::Fail => Err(GenerationError::Provider {
                reason: "mock generator failure".to_string(),
            }),
        }
    }
}
