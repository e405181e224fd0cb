use chrono::{DateTime, Utc};
use cura_memory::{
    Classification, KeyValueStore, Message, Mood, MoodEntry, Sender, SessionStore,
    CHAT_HISTORY_KEY, MOOD_HISTORY_KEY,
};
use tracing::{debug, info, warn};

use crate::errors::SessionError;
use crate::resolver::{ConversationContext, ReplySource, ResponseResolver};
use crate::responses::GREETING;

/// Where the session is in the current user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingReply,
}

/// Result of a settled user turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: Message,
    pub crisis: bool,
    pub source: ReplySource,
}

/// One chat transcript plus mood log, persisted after every change.
#[derive(Debug)]
pub struct ConversationSession<S: KeyValueStore> {
    store: SessionStore<S>,
    resolver: ResponseResolver,
    context: ConversationContext,
    messages: Vec<Message>,
    mood_history: Vec<MoodEntry>,
    phase: SessionPhase,
    pending: Option<String>,
    crisis_alert: bool,
}

impl<S: KeyValueStore> ConversationSession<S> {
    /// Rehydrate from the store, seeding a greeting when there is no transcript yet
    pub fn open(store: SessionStore<S>, resolver: ResponseResolver) -> Self {
        let messages: Vec<Message> = store.load(CHAT_HISTORY_KEY);
        let mood_history: Vec<MoodEntry> = store.load(MOOD_HISTORY_KEY);
        info!(
            messages = messages.len(),
            moods = mood_history.len(),
            online = resolver.is_online(),
            "Opened conversation session"
        );

        let mut session = Self {
            store,
            resolver,
            context: ConversationContext::new(),
            messages,
            mood_history,
            phase: SessionPhase::Idle,
            pending: None,
            crisis_alert: false,
        };

        if session.messages.is_empty() {
            session.messages.push(greeting());
            session.persist_messages();
        }

        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn mood_history(&self) -> &[MoodEntry] {
        &self.mood_history
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Typing indicator
    pub fn pending_reply(&self) -> bool {
        self.phase == SessionPhase::AwaitingReply
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Whether the crisis resources should be on screen
    pub fn crisis_alert(&self) -> bool {
        self.crisis_alert
    }

    pub fn dismiss_crisis_alert(&mut self) {
        self.crisis_alert = false;
    }

    pub fn current_mood(&self) -> Option<Mood> {
        self.mood_history.last().map(|entry| entry.mood)
    }

    /// Suggestion for the most recent mood, if one has been selected
    pub fn recommendation(&self) -> Option<&'static str> {
        self.current_mood().map(|mood| mood.recommendation())
    }

    /// Append the user's message and enter `AwaitingReply`
    pub fn begin_turn(&mut self, text: &str) -> Result<&Message, SessionError> {
        if self.pending_reply() {
            return Err(SessionError::ReplyPending);
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let index = self.push_message(text.to_string(), Sender::User, None);
        self.pending = Some(text.to_string());
        self.phase = SessionPhase::AwaitingReply;
        self.persist_messages();

        let message = &self.messages[index];
        debug!(message_id = message.id, "User message appended");
        Ok(message)
    }

    /// Resolve the pending message, append the reply and return to `Idle`
    pub async fn finish_turn(&mut self) -> Result<TurnOutcome, SessionError> {
        // Cleared only once the reply is appended, so a dropped call can be retried
        let text = self.pending.clone().ok_or(SessionError::NoPendingTurn)?;

        let resolution = self.resolver.resolve(&text, &mut self.context).await;
        let crisis = resolution.is_crisis();
        if crisis {
            self.crisis_alert = true;
        }

        let index = self.push_message(
            resolution.text,
            Sender::Assistant,
            Some(resolution.classification),
        );
        self.pending = None;
        self.phase = SessionPhase::Idle;
        self.persist_messages();

        let reply = self.messages[index].clone();
        info!(message_id = reply.id, source = ?resolution.source, crisis, "Turn settled");

        Ok(TurnOutcome {
            reply,
            crisis,
            source: resolution.source,
        })
    }

    /// Send a message and wait for the reply
    pub async fn submit(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        self.begin_turn(text)?;
        self.finish_turn().await
    }

    /// Log a mood and add the matching "I'm feeling ..." message to the transcript
    pub fn select_mood(
        &mut self,
        mood: Mood,
        note: Option<String>,
    ) -> Result<&MoodEntry, SessionError> {
        if self.pending_reply() {
            return Err(SessionError::ReplyPending);
        }

        let timestamp = self.next_timestamp();
        let id = self.mood_history.last().map(|entry| entry.id + 1).unwrap_or(1);
        let index = self.mood_history.len();
        self.mood_history.push(MoodEntry {
            id,
            mood,
            timestamp,
            note: note.filter(|n| !n.trim().is_empty()),
        });

        self.push_message(
            format!("I'm feeling {} today.", mood),
            Sender::User,
            Some(Classification::Mood),
        );

        self.persist_moods();
        self.persist_messages();
        info!(mood = %mood, "Mood selected");

        Ok(&self.mood_history[index])
    }

    /// Start over with a single greeting. Mood history is kept.
    pub fn clear_history(&mut self) -> Result<(), SessionError> {
        if self.pending_reply() {
            return Err(SessionError::ReplyPending);
        }

        self.messages = vec![greeting()];
        self.context.clear();
        self.crisis_alert = false;

        if let Err(e) = self.store.remove(CHAT_HISTORY_KEY) {
            warn!(error = %e, "Failed to remove stored chat history");
        }
        info!("Chat history cleared");
        Ok(())
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }

    /// Appends with the next id and a non-decreasing timestamp; returns the index
    fn push_message(
        &mut self,
        text: String,
        sender: Sender,
        classification: Option<Classification>,
    ) -> usize {
        let id = self.messages.last().map(|m| m.id + 1).unwrap_or(1);
        let timestamp = self.next_timestamp();
        self.messages
            .push(Message::new(id, text, sender, timestamp, classification));
        self.messages.len() - 1
    }

    fn persist_messages(&self) {
        if let Err(e) = self.store.save(CHAT_HISTORY_KEY, &self.messages) {
            warn!(error = %e, "Failed to persist chat history");
        }
    }

    fn persist_moods(&self) {
        if let Err(e) = self.store.save(MOOD_HISTORY_KEY, &self.mood_history) {
            warn!(error = %e, "Failed to persist mood history");
        }
    }
}

fn greeting() -> Message {
    Message::new(1, GREETING, Sender::Assistant, Utc::now(), None)
}
