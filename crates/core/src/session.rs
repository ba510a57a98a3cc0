//! Client state that survives restarts: the selected source, raw input,
//! current result, active tab and chat history.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    client::{AnalysisBackend, AnalyzeRequest, ChatRequest},
    error::{Result, TldwError},
    normalize::normalize_tagged,
    source::{Origin, SourceKind},
    store::KeyValueStore,
    types::ContentResult,
};

pub const STATE_KEY: &str = "tldw.state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Chapters,
    Terms,
    Flashcards,
    Quiz,
    Transcript,
    Mindmap,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub source_kind: SourceKind,
    pub raw_input: String,
    pub result: Option<ContentResult>,
    pub active_tab: Tab,
    pub chat_history: Vec<ChatMessage>,
}

/// Which analysis response is allowed to replace the displayed result when
/// several are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponsePolicy {
    /// Only the most recently submitted request may update the result.
    #[default]
    LastRequestWins,
    /// Whatever resolves last overwrites the result.
    LastResponseWins,
}

impl FromStr for ResponsePolicy {
    type Err = TldwError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last-request" => Ok(Self::LastRequestWins),
            "last-response" => Ok(Self::LastResponseWins),
            other => Err(TldwError::InvalidInput(format!(
                "unknown response policy: {other}"
            ))),
        }
    }
}

impl fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastRequestWins => "last-request",
            Self::LastResponseWins => "last-response",
        })
    }
}

/// Handle for one submitted analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    origin: Origin,
}

impl Ticket {
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

pub struct Session<S: KeyValueStore> {
    store: S,
    state: PersistedState,
    policy: ResponsePolicy,
    next_seq: u64,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the persisted state from `store`, or start empty.
    pub fn open(store: S, policy: ResponsePolicy) -> Self {
        let state = load_state(&store);
        Self {
            store,
            state,
            policy,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The result, if it was produced for the currently selected source kind.
    pub fn matching_result(&self) -> Option<&ContentResult> {
        self.state
            .result
            .as_ref()
            .filter(|result| result.matches(self.state.source_kind))
    }

    pub fn select_source(&mut self, kind: SourceKind) -> Result<()> {
        self.state.source_kind = kind;
        self.persist()
    }

    pub fn set_input(&mut self, raw_input: impl Into<String>) -> Result<()> {
        self.state.raw_input = raw_input.into();
        self.persist()
    }

    pub fn set_tab(&mut self, tab: Tab) -> Result<()> {
        self.state.active_tab = tab;
        self.persist()
    }

    /// Record a new analysis request for the selected source and input.
    pub fn begin_analysis(&mut self) -> Ticket {
        self.next_seq += 1;
        let ticket = Ticket {
            seq: self.next_seq,
            origin: Origin::new(self.state.source_kind, self.state.raw_input.clone()),
        };
        tracing::debug!(seq = ticket.seq, source = %ticket.origin.kind, "Analysis submitted");
        ticket
    }

    /// Apply a resolved analysis payload. Returns whether it replaced the
    /// displayed result.
    pub fn complete_analysis(&mut self, ticket: Ticket, payload: &Value) -> Result<bool> {
        if self.policy == ResponsePolicy::LastRequestWins && ticket.seq != self.next_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.next_seq,
                "Dropping stale analysis response"
            );
            return Ok(false);
        }

        self.state.result = Some(normalize_tagged(payload, ticket.origin));
        self.state.chat_history.clear();
        self.persist()?;
        Ok(true)
    }

    /// Submit the selected input to `backend` and apply the response.
    pub async fn analyze<B: AnalysisBackend + ?Sized>(&mut self, backend: &B) -> Result<bool> {
        if self.state.raw_input.trim().is_empty() {
            return Err(TldwError::InvalidInput("nothing to analyze".to_string()));
        }
        let ticket = self.begin_analysis();
        let payload = backend.analyze(&AnalyzeRequest::new(&ticket.origin)).await?;
        self.complete_analysis(ticket, &payload)
    }

    pub fn push_chat(&mut self, role: Role, content: impl Into<String>) -> Result<()> {
        self.state.chat_history.push(ChatMessage {
            role,
            content: content.into(),
        });
        self.persist()
    }

    /// Ask a follow-up question about the current result.
    pub async fn chat<B: AnalysisBackend + ?Sized>(
        &mut self,
        backend: &B,
        message: &str,
    ) -> Result<String> {
        let url = match &self.state.result {
            Some(ContentResult {
                origin: Some(origin),
                ..
            }) => origin.input.clone(),
            _ => return Err(TldwError::InvalidInput("no analysis to chat about".to_string())),
        };

        self.push_chat(Role::User, message)?;
        let request = ChatRequest {
            url,
            history: self.state.chat_history.clone(),
        };
        let answer = backend.chat(&request).await?;
        self.push_chat(Role::Assistant, answer.clone())?;
        Ok(answer)
    }

    /// Discard everything and remove the persisted blob.
    pub fn reset(&mut self) -> Result<()> {
        self.state = PersistedState::default();
        self.store.remove(STATE_KEY)
    }

    fn persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.state)?;
        self.store.set(STATE_KEY, &blob)
    }
}

fn load_state<S: KeyValueStore>(store: &S) -> PersistedState {
    let blob = match store.get(STATE_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return PersistedState::default(),
        Err(e) => {
            tracing::warn!("Failed to read persisted state: {}", e);
            return PersistedState::default();
        }
    };

    serde_json::from_str(&blob).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed persisted state: {}", e);
        PersistedState::default()
    })
}
