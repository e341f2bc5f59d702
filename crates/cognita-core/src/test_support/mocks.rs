//! Mock implementations of the extraction and reasoning seams
//!
//! Both mocks are deterministic and record every call so tests can assert
//! on what the orchestrator asked for.
//!
//! ```rust,ignore
//! use cognita_core::test_support::ScriptedExtractor;
//! use cognita_core::types::{Atom, UnitKind};
//!
//! let extractor = ScriptedExtractor::new()
//!     .with_atoms("Second paragraph.", vec![Atom::new("Gravity", UnitKind::Concept, "")])
//!     .failing_on("broken block");
//! assert_eq!(extractor.stats().calls, 0);
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{
    AtomExtractor, ExtractionError, LlmError, LlmResult, ReasoningRequest, ReasoningService,
};
use crate::types::{Atom, BlockKind};

type CallHook = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorStats {
    pub calls: usize,
    pub failures: usize,
}

#[derive(Default)]
struct ExtractorState {
    seen: Vec<(String, BlockKind)>,
    stats: ExtractorStats,
}

/// Extractor answering from a fixed script keyed by block text
///
/// Unscripted text yields no atoms.
#[derive(Clone, Default)]
pub struct ScriptedExtractor {
    responses: HashMap<String, Vec<Atom>>,
    failures: HashSet<String>,
    fail_all: bool,
    on_call: Option<CallHook>,
    state: Arc<Mutex<ExtractorState>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_atoms(mut self, text: impl Into<String>, atoms: Vec<Atom>) -> Self {
        self.responses.insert(text.into(), atoms);
        self
    }

    #[must_use]
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failures.insert(text.into());
        self
    }

    #[must_use]
    pub fn failing_always(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Run `hook` with the 1-based call number after every call
    #[must_use]
    pub fn on_call(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_call = Some(Arc::new(hook));
        self
    }

    pub fn stats(&self) -> ExtractorStats {
        self.lock().stats.clone()
    }

    /// Block texts in the order they were submitted
    pub fn seen_texts(&self) -> Vec<String> {
        self.lock().seen.iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn seen_kinds(&self) -> Vec<BlockKind> {
        self.lock().seen.iter().map(|(_, k)| *k).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ExtractorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AtomExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        text: &str,
        block_kind: BlockKind,
    ) -> Result<Vec<Atom>, ExtractionError> {
        let failed = self.fail_all || self.failures.contains(text);
        let call = {
            let mut state = self.lock();
            state.seen.push((text.to_string(), block_kind));
            state.stats.calls += 1;
            if failed {
                state.stats.failures += 1;
            }
            state.stats.calls
        };

        if let Some(hook) = &self.on_call {
            hook(call);
        }

        if failed {
            return Err(ExtractionError::Service(LlmError::HttpError(
                "simulated failure".to_string(),
            )));
        }
        Ok(self.responses.get(text).cloned().unwrap_or_default())
    }
}

/// Reasoning service replaying queued replies
///
/// Once the queue is drained every call gets the default reply.
pub struct MockReasoningService {
    replies: Mutex<VecDeque<LlmResult<String>>>,
    default_reply: String,
    requests: Mutex<Vec<ReasoningRequest>>,
}

impl Default for MockReasoningService {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: String::new(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockReasoningService {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    pub fn push_reply(&self, reply: LlmResult<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<ReasoningRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ReasoningService for MockReasoningService {
    async fn complete(&self, request: ReasoningRequest) -> LlmResult<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_reply.clone()))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
