use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cura_core::{CoreError, CuraConfig, GenerativeClient, Prompt, Turn, MAX_HISTORY_WINDOW};
use cura_memory::Classification;
use tracing::{debug, info, warn};

use crate::crisis::{self, CRISIS_RESPONSE};
use crate::responses::{self, PERSONA};

/// Turns kept in a [`ConversationContext`]
pub const MAX_CONTEXT_TURNS: usize = 20;

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    CrisisProtocol,
    Remote,
    Fallback,
}

/// A resolved assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub classification: Classification,
    pub source: ReplySource,
}

impl Resolution {
    /// Set only by the crisis check, never inferred from the reply text
    pub fn is_crisis(&self) -> bool {
        self.classification == Classification::Crisis
    }
}

/// Conversation state the resolver needs between calls.
///
/// Owned by the session and handed to every [`ResponseResolver::resolve`] call,
/// so separate sessions never share context.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    turns: VecDeque<Turn>,
    generic_cursor: usize,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > MAX_CONTEXT_TURNS {
            self.turns.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.generic_cursor = 0;
    }

    fn next_generic_reply(&mut self) -> &'static str {
        let reply = responses::generic_reply(self.generic_cursor);
        self.generic_cursor = self.generic_cursor.wrapping_add(1);
        reply
    }
}

/// Produces the assistant's reply: crisis protocol, then the remote model, then canned replies.
#[derive(Clone)]
pub struct ResponseResolver {
    client: Option<Arc<dyn GenerativeClient>>,
    persona: String,
    history_window: usize,
    timeout: Duration,
}

impl std::fmt::Debug for ResponseResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("model", &self.client.as_ref().map(|c| c.model_name()))
            .field("history_window", &self.history_window)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ResponseResolver {
    pub fn new(client: Option<Arc<dyn GenerativeClient>>) -> Self {
        Self {
            client,
            persona: PERSONA.to_string(),
            history_window: MAX_HISTORY_WINDOW,
            timeout: Duration::from_secs(cura_core::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn online(client: Arc<dyn GenerativeClient>) -> Self {
        Self::new(Some(client))
    }

    /// Never calls out; every non-crisis message gets a canned reply
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &CuraConfig, client: Option<Arc<dyn GenerativeClient>>) -> Self {
        let mut resolver = Self::new(client)
            .with_history_window(config.history_window())
            .with_timeout(Duration::from_secs(config.timeout_secs()));
        if let Some(persona) = config.system_prompt.as_ref().filter(|p| !p.trim().is_empty()) {
            resolver = resolver.with_persona(persona.clone());
        }
        resolver
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.min(MAX_HISTORY_WINDOW);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Resolve the reply for `message`. Always produces an answer.
    pub async fn resolve(&self, message: &str, context: &mut ConversationContext) -> Resolution {
        if crisis::detect(message) {
            warn!("Crisis keywords detected, returning crisis resources");
            return Resolution {
                text: CRISIS_RESPONSE.to_string(),
                classification: Classification::Crisis,
                source: ReplySource::CrisisProtocol,
            };
        }

        if let Some(client) = &self.client {
            match self.call_remote(client.as_ref(), message, context).await {
                Ok(text) => {
                    info!(reply_len = text.len(), "Received reply from model");
                    context.push(Turn::user(message));
                    context.push(Turn::model(text.clone()));
                    return Resolution {
                        text,
                        classification: Classification::Normal,
                        source: ReplySource::Remote,
                    };
                }
                Err(e) => {
                    warn!(error = %e, "Model call failed, using local reply");
                }
            }
        }

        let text = match responses::match_topic(message) {
            Some(topic) => {
                debug!(topic = topic.name, "Matched local topic");
                topic.reply
            }
            None => context.next_generic_reply(),
        };

        context.push(Turn::user(message));
        context.push(Turn::model(text));

        Resolution {
            text: text.to_string(),
            classification: Classification::Normal,
            source: ReplySource::Fallback,
        }
    }

    async fn call_remote(
        &self,
        client: &dyn GenerativeClient,
        message: &str,
        context: &ConversationContext,
    ) -> Result<String, CoreError> {
        let prompt = Prompt {
            system_instruction: self.persona.clone(),
            history: context.recent(self.history_window),
            message: message.to_string(),
        };

        let text = tokio::time::timeout(self.timeout, client.generate(&prompt))
            .await
            .map_err(|_| CoreError::Timeout(self.timeout.as_secs()))??;

        if text.trim().is_empty() {
            return Err(CoreError::ResponseError("Model returned empty text".to_string()));
        }
        Ok(text)
    }
}
