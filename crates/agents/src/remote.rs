use anyhow::{bail, Result};
use salario_core::{Employee, Tab};

use crate::gemini::{GeminiChatClient, GeminiConfig};

/// Remote language-model collaborator. Any error is treated the same way by
/// the router, so implementations do not need to classify failures.
pub trait RemoteChat: Send + Sync {
    async fn get_chat_response(&self, message: &str, employees: &[Employee]) -> Result<String>;
}

/// Host callbacks for navigation side effects. Fire-and-forget.
pub trait UiActions: Send + Sync {
    fn navigate_to(&self, tab: Tab);
    fn open_add_employee_form(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRemote;

impl RemoteChat for OfflineRemote {
    async fn get_chat_response(&self, _message: &str, _employees: &[Employee]) -> Result<String> {
        bail!("remote model not configured")
    }
}

#[derive(Debug, Clone)]
pub enum RemoteBackend {
    Gemini(GeminiChatClient),
    Offline(OfflineRemote),
}

impl RemoteBackend {
    /// Gemini when an API key is present in the environment, offline otherwise.
    pub fn from_env() -> Result<Self> {
        match GeminiConfig::from_env() {
            Some(config) => Ok(Self::Gemini(GeminiChatClient::new(config)?)),
            None => Ok(Self::Offline(OfflineRemote)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RemoteBackend::Gemini(_) => "gemini",
            RemoteBackend::Offline(_) => "offline",
        }
    }
}

impl RemoteChat for RemoteBackend {
    async fn get_chat_response(&self, message: &str, employees: &[Employee]) -> Result<String> {
        match self {
            RemoteBackend::Gemini(client) => client.get_chat_response(message, employees).await,
            RemoteBackend::Offline(remote) => remote.get_chat_response(message, employees).await,
        }
    }
}
