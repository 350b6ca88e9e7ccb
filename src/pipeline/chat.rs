//! Robot panel: conversation with the philosophy-professor persona.
//!
//! The visible transcript is append-only.  Every send adds exactly one user
//! message and then exactly one assistant message, which is the in-character
//! fallback line when the provider fails.

use std::sync::{Arc, Mutex};

use crate::genai::{ChatSession, GenerationClient, Outcome};
use crate::media::MediaPayload;
use crate::messages;

use super::state::{lock, ErrorBanner, RunToken, RunTracker, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug)]
pub struct ChatState {
    pub status: TaskStatus,
    pub messages: Vec<ChatMessage>,
    /// Text box contents; voice dictation appends here.
    pub draft: String,
    session: ChatSession,
    next_id: u64,
    runs: RunTracker,
}

impl ChatState {
    fn new(session: ChatSession) -> Self {
        let mut state = Self {
            status: TaskStatus::Idle,
            messages: Vec::new(),
            draft: String::new(),
            session,
            next_id: 0,
            runs: RunTracker::default(),
        };
        state.push(ChatRole::Assistant, messages::CHAT_GREETING);
        state
    }

    fn push(&mut self, role: ChatRole, text: impl Into<String>) {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            text: text.into(),
        });
    }
}

#[derive(Clone)]
pub struct ChatPanel {
    state: Arc<Mutex<ChatState>>,
    client: Arc<GenerationClient>,
    banner: ErrorBanner,
}

impl ChatPanel {
    pub fn new(client: Arc<GenerationClient>, banner: ErrorBanner) -> Self {
        let session = client.create_chat_session();
        Self {
            state: Arc::new(Mutex::new(ChatState::new(session))),
            client,
            banner,
        }
    }

    pub fn view<R>(&self, f: impl FnOnce(&ChatState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn status(&self) -> TaskStatus {
        lock(&self.state).status
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.state).messages.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        lock(&self.state).draft = text.into();
    }

    /// Append the user's message and enter `Loading`.
    ///
    /// Blank text or a reply still pending → `None`, nothing appended.
    pub fn begin(&self, text: &str) -> Option<(RunToken, String, ChatSession)> {
        let text = text.trim();
        let mut st = lock(&self.state);
        if text.is_empty() || st.status.is_busy() {
            return None;
        }

        st.push(ChatRole::User, text);
        st.draft.clear();
        st.status = TaskStatus::Loading;
        let token = st.runs.start();
        Some((token, text.to_string(), st.session.clone()))
    }

    pub async fn execute(&self, token: RunToken, text: String, mut session: ChatSession) {
        let reply = match self.client.send_message(&mut session, &text).await {
            Ok(reply) => Outcome::Complete(reply),
            Err(cause) => {
                log::warn!("chat: {cause}");
                Outcome::Degraded {
                    value: messages::CHAT_FALLBACK_REPLY.to_string(),
                    cause,
                }
            }
        };

        let mut st = lock(&self.state);
        if !st.runs.is_current(token) {
            return;
        }
        st.runs.finish(token);

        if reply.is_degraded() {
            st.status = TaskStatus::Error;
        } else {
            st.session = session;
            st.status = TaskStatus::Done;
        }
        st.push(ChatRole::Assistant, reply.into_value());
    }

    pub async fn send(&self, text: &str) -> Option<RunToken> {
        let (token, text, session) = self.begin(text)?;
        self.execute(token, text, session).await;
        Some(token)
    }

    /// Transcribe `audio` and append the text to the draft.
    pub async fn dictate(&self, audio: MediaPayload) {
        match self.client.transcribe(&audio).await {
            Ok(text) if !text.trim().is_empty() => {
                let mut st = lock(&self.state);
                if !st.draft.is_empty() && !st.draft.ends_with(' ') {
                    st.draft.push(' ');
                }
                st.draft.push_str(text.trim());
            }
            Ok(_) => log::debug!("chat: dictation produced no text"),
            Err(e) => {
                log::error!("chat: {e}");
                self.banner.raise(e.user_message());
            }
        }
    }

    /// Start a fresh conversation; a pending reply is discarded.
    pub fn restart(&self) {
        let session = self.client.create_chat_session();
        let mut st = lock(&self.state);
        st.runs.invalidate();
        let runs = std::mem::take(&mut st.runs);
        *st = ChatState::new(session);
        st.runs = runs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::{ModelSet, ProviderError, ScriptedProvider};

    fn panel_with(provider: ScriptedProvider) -> (ChatPanel, Arc<ScriptedProvider>, ErrorBanner) {
        let provider = Arc::new(provider);
        let client = Arc::new(GenerationClient::new(provider.clone(), ModelSet::default()));
        let banner = ErrorBanner::new();
        (ChatPanel::new(client, banner.clone()), provider, banner)
    }

    fn roles(panel: &ChatPanel) -> Vec<ChatRole> {
        panel.messages().iter().map(|m| m.role).collect()
    }

    #[test]
    fn opens_with_greeting() {
        let (panel, _, _) = panel_with(ScriptedProvider::new());
        let messages = panel.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::Assistant);
        assert_eq!(messages[0].text, messages::CHAT_GREETING);
    }

    #[tokio::test]
    async fn successful_send_appends_user_then_assistant() {
        let (panel, _, _) = panel_with(
            ScriptedProvider::new()
                .with_content(|_, _| Ok(ScriptedProvider::text_reply("¿Y vos qué pensás, che?"))),
        );

        panel.send("¿qué es la libertad?").await;

        let messages = panel.messages();
        assert_eq!(roles(&panel), [ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]);
        assert_eq!(messages[1].text, "¿qué es la libertad?");
        assert_eq!(messages[2].text, "¿Y vos qué pensás, che?");
        assert_eq!(panel.status(), TaskStatus::Done);
    }

    #[tokio::test]
    async fn failed_send_appends_fallback_line() {
        let (panel, _, banner) = panel_with(
            ScriptedProvider::new().with_content(|_, _| Err(ProviderError::Timeout)),
        );

        panel.send("¿qué es la libertad?").await;

        let messages = panel.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[2].text, messages::CHAT_FALLBACK_REPLY);
        assert!(!panel.status().is_busy());
        assert!(banner.current().is_none());
    }

    #[tokio::test]
    async fn failed_exchange_is_not_replayed() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let fail = AtomicBool::new(true);
        let (panel, provider, _) = panel_with(ScriptedProvider::new().with_content(move |_, _| {
            if fail.swap(false, Ordering::SeqCst) {
                Err(ProviderError::Timeout)
            } else {
                Ok(ScriptedProvider::text_reply("Mirá..."))
            }
        }));

        panel.send("primera").await;
        panel.send("segunda").await;

        let requests = provider.content_requests();
        assert_eq!(requests[1].1.contents.len(), 1);
        assert_eq!(requests[1].1.prompt_text(), "segunda");
    }

    #[tokio::test]
    async fn history_grows_across_successful_sends() {
        let (panel, provider, _) = panel_with(ScriptedProvider::new());

        panel.send("uno").await;
        panel.send("dos").await;

        assert_eq!(provider.content_requests()[1].1.contents.len(), 3);
        let ids: Vec<_> = panel.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn blank_message_is_ignored() {
        let (panel, provider, _) = panel_with(ScriptedProvider::new());
        assert!(panel.send("   ").await.is_none());
        assert_eq!(panel.messages().len(), 1);
        assert_eq!(provider.content_calls(), 0);
    }

    #[test]
    fn pending_reply_blocks_next_send() {
        let (panel, _, _) = panel_with(ScriptedProvider::new());
        assert!(panel.begin("hola").is_some());
        assert!(panel.begin("¿estás?").is_none());
        assert_eq!(panel.messages().len(), 2);
    }

    #[tokio::test]
    async fn restart_discards_pending_reply() {
        let (panel, _, _) = panel_with(ScriptedProvider::new());
        let (token, text, session) = panel.begin("hola").unwrap();

        panel.restart();
        panel.execute(token, text, session).await;

        assert_eq!(panel.messages().len(), 1);
        assert_eq!(panel.status(), TaskStatus::Idle);
    }

    #[tokio::test]
    async fn dictation_appends_to_draft() {
        let (panel, _, _) = panel_with(
            ScriptedProvider::new().with_content(|_, _| Ok(ScriptedProvider::text_reply(" el ser "))),
        );
        panel.set_draft("pensando en");

        panel
            .dictate(MediaPayload::from_bytes(b"RIFF", "audio/wav", "voz.wav"))
            .await;

        assert_eq!(panel.view(|st| st.draft.clone()), "pensando en el ser");
    }

    #[tokio::test]
    async fn dictation_failure_raises_banner() {
        let (panel, _, banner) = panel_with(
            ScriptedProvider::new().with_content(|_, _| Err(ProviderError::Timeout)),
        );
        panel
            .dictate(MediaPayload::from_bytes(b"RIFF", "audio/wav", "voz.wav"))
            .await;
        assert_eq!(banner.current().as_deref(), Some(messages::TRANSCRIPTION_FAILED));
    }
}
