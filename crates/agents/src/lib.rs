mod gemini;
mod remote;
mod router;

pub use gemini::{
    extract_candidate_text, system_instruction, GeminiChatClient, GeminiConfig, EMPTY_REPLY,
};
pub use remote::{OfflineRemote, RemoteBackend, RemoteChat, UiActions};
pub use router::{ChatRouter, RouterState};
