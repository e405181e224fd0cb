// The cura-memory crate holds the conversation data model and its persistence.
// Chat and mood history are stored per device under two fixed keys and
// reloaded when a session starts.

pub mod errors;
pub mod model;
pub mod store;

pub use errors::StoreError;
pub use model::{Classification, Message, Mood, MoodEntry, Sender};
pub use store::{
    FileStore, InMemoryStore, KeyValueStore, SessionStore, CHAT_HISTORY_KEY, MOOD_HISTORY_KEY,
};
