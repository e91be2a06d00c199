pub mod backend;
pub mod code;
pub mod decoder;
pub mod error;
pub mod header;
pub mod models;
pub mod session;
pub mod stream;
pub mod view;

pub use backend::{BoxError, ByteStream, ChatBackend};
pub use error::{DecodeError, StreamError};
pub use models::{ChatRequest, Conversation, ConversationSummary, Message, Role};
pub use session::{ChatSession, Rejection, StopHandle, Turn, TurnOutcome};
pub use stream::{STOPPED_SUFFIX, StreamEvent, StreamOutcome, StreamSession, StreamSink};
pub use view::{ChatView, ViewSink};
