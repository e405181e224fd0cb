use thiserror::Error;

/// Rejected session operations. Remote and storage failures never show up here.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A reply is still pending")]
    ReplyPending,

    #[error("No message is waiting for a reply")]
    NoPendingTurn,
}
