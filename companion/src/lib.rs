// The cura-companion crate runs the support conversation.
// A user message first goes through the crisis detector. Crisis messages get a
// fixed helpline reply; everything else is sent to the generative model, and
// any failure there falls back to a local table of canned replies.
// ConversationSession ties this to the persisted transcript and mood log.

pub mod crisis;
pub mod errors;
pub mod resolver;
pub mod responses;
pub mod session;

pub use crisis::{detect, Helpline, CRISIS_RESPONSE, HELPLINES};
pub use errors::SessionError;
pub use resolver::{ConversationContext, ReplySource, Resolution, ResponseResolver};
pub use session::{ConversationSession, SessionPhase, TurnOutcome};
