//! Chat controller.
//!
//! Drives a question through `Idle -> Sending -> Idle`, and runs the two
//! auxiliary actions (new chat, health check). Transport failures never
//! escape: they become a bot bubble and the controller returns to `Idle`.

use crate::backend::{ChatBackend, ChatRequest, ChatResponse};
use crate::composer::{Composer, Key, KeyAction};
use crate::session::SessionState;
use crate::transcript::{MessageMeta, TranscriptSink};

/// Shown when the backend replies without an answer.
pub const EMPTY_ANSWER_PLACEHOLDER: &str = "(jawaban kosong)";

/// Shown when the chat exchange fails.
pub const CLIENT_ERROR_MESSAGE: &str =
    "❌ Gagal menghubungi server. Pastikan backend berjalan dan dapat dijangkau.";

/// Shown when the health check fails.
pub const HEALTH_ERROR_MESSAGE: &str = "Tidak bisa memanggil /api/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Held for the duration of a blocking exchange. `submit` always returns
    /// in `Idle`; a backend or sink running inside the exchange would see
    /// this value.
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The backend replied and its answer was shown.
    Answered,
    /// The exchange failed and the client error was shown.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewChatOutcome {
    /// No session existed; the widget was simply reset.
    Reloaded,
    /// The backend was asked to drop the session, then the widget was reset.
    ClearedAndReloaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    Reported,
    Failed,
}

pub struct ChatController<B, S> {
    backend: B,
    sink: S,
    session: SessionState,
    composer: Composer,
    phase: Phase,
}

impl<B: ChatBackend, S: TranscriptSink> ChatController<B, S> {
    pub fn new(backend: B, sink: S, composer: Composer) -> Self {
        Self {
            backend,
            sink,
            session: SessionState::new(),
            composer,
            phase: Phase::Idle,
        }
    }

    /// Send `text` as a question.
    ///
    /// Blank input is ignored without touching the transcript or network.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.sink.append_user(text);
        self.composer.clear();
        let typing = self.sink.show_typing();
        self.composer.set_send_enabled(false);
        self.phase = Phase::Sending;

        let request = ChatRequest {
            question: text.to_string(),
            session_id: self.session.current_session().to_string(),
        };
        let result = self.backend.chat(&request);
        self.sink.hide_typing(typing);

        let outcome = match result {
            Ok(response) => {
                self.show_answer(response);
                SubmitOutcome::Answered
            }
            Err(e) => {
                log::warn!("Chat exchange failed: {}", e);
                self.sink
                    .append_bot(CLIENT_ERROR_MESSAGE, &MessageMeta::client_error());
                SubmitOutcome::Failed
            }
        };

        self.composer.set_send_enabled(true);
        self.phase = Phase::Idle;
        outcome
    }

    /// Send one of the preset example questions.
    pub fn quick_ask(&mut self, question: &str) -> SubmitOutcome {
        self.submit(question)
    }

    /// Feed a key press to the composer; plain Enter submits its text.
    pub fn handle_key(&mut self, key: Key) -> Option<SubmitOutcome> {
        match self.composer.handle_key(key) {
            KeyAction::Submit => {
                let text = self.composer.text().to_string();
                let outcome = self.submit(&text);
                if outcome == SubmitOutcome::Ignored {
                    // Only whitespace is left; drop it so the next line starts clean.
                    self.composer.clear();
                }
                Some(outcome)
            }
            KeyAction::Edited => None,
        }
    }

    /// Start over.
    ///
    /// With a session, the backend is asked to drop it first; that request
    /// may fail without stopping the reset.
    pub fn new_chat(&mut self) -> NewChatOutcome {
        if !self.session.has_session() {
            self.reload();
            return NewChatOutcome::Reloaded;
        }

        if let Err(e) = self.backend.clear_session(self.session.current_session()) {
            log::warn!("Failed to clear session on backend: {}", e);
        }
        self.reload();
        NewChatOutcome::ClearedAndReloaded
    }

    /// Ask the backend for its status and show it as a bot bubble.
    pub fn health_check(&mut self) -> HealthOutcome {
        match self.backend.health() {
            Ok(snapshot) => {
                self.sink.append_bot(
                    &snapshot.summary(),
                    &MessageMeta::new("system", "health", true),
                );
                HealthOutcome::Reported
            }
            Err(e) => {
                log::warn!("Health check failed: {}", e);
                self.sink
                    .append_bot(HEALTH_ERROR_MESSAGE, &MessageMeta::client_error());
                HealthOutcome::Failed
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn show_answer(&mut self, response: ChatResponse) {
        self.session.set_session(response.session_id.as_deref());
        let answer = response
            .answer
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| EMPTY_ANSWER_PLACEHOLDER.to_string());
        let meta = MessageMeta {
            source: response.source,
            intent: response.intent,
            has_data: Some(response.has_data.unwrap_or(false)),
        };
        self.sink.append_bot(&answer, &meta);
    }

    fn reload(&mut self) {
        self.sink.clear();
        self.session.reset();
        self.composer.clear();
        self.composer.set_send_enabled(true);
        self.phase = Phase::Idle;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, HealthSnapshot};
    use crate::transcript::{Entry, Role, Transcript, TypingToken};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeBackend {
        replies: RefCell<VecDeque<Result<ChatResponse, BackendError>>>,
        requests: RefCell<Vec<ChatRequest>>,
        cleared: RefCell<Vec<String>>,
        clear_fails: bool,
        health: Option<HealthSnapshot>,
    }

    impl FakeBackend {
        fn replying(replies: Vec<Result<ChatResponse, BackendError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                ..Default::default()
            }
        }
    }

    impl ChatBackend for FakeBackend {
        fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
            self.requests.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::Transport("no reply queued".to_string())))
        }

        fn clear_session(&self, session_id: &str) -> Result<(), BackendError> {
            self.cleared.borrow_mut().push(session_id.to_string());
            if self.clear_fails {
                Err(BackendError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        fn health(&self) -> Result<HealthSnapshot, BackendError> {
            self.health.clone().ok_or_else(|| BackendError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    /// Records the order of sink calls while keeping a real transcript.
    #[derive(Default)]
    struct RecordingSink {
        transcript: Transcript,
        calls: Vec<String>,
    }

    impl TranscriptSink for RecordingSink {
        fn append_user(&mut self, text: &str) {
            self.calls.push(format!("user:{text}"));
            self.transcript.append_user(text);
        }

        fn append_bot(&mut self, answer: &str, meta: &MessageMeta) {
            self.calls.push(format!("bot:{answer}"));
            self.transcript.append_bot(answer, meta);
        }

        fn show_typing(&mut self) -> TypingToken {
            let token = self.transcript.show_typing();
            self.calls.push(format!("show:{}", token.0));
            token
        }

        fn hide_typing(&mut self, token: TypingToken) {
            self.calls.push(format!("hide:{}", token.0));
            self.transcript.hide_typing(token);
        }

        fn clear(&mut self) {
            self.calls.push("clear".to_string());
            self.transcript.clear();
        }
    }

    fn answer(text: &str, session_id: &str) -> ChatResponse {
        ChatResponse {
            answer: Some(text.to_string()),
            session_id: Some(session_id.to_string()),
            source: Some("database".to_string()),
            intent: Some("jadwal_uas".to_string()),
            has_data: Some(true),
        }
    }

    fn controller(backend: FakeBackend) -> ChatController<FakeBackend, Transcript> {
        ChatController::new(backend, Transcript::new(), Composer::default())
    }

    fn bot_messages(transcript: &Transcript) -> Vec<(String, MessageMeta)> {
        transcript
            .messages()
            .filter(|m| m.role == Role::Bot)
            .map(|m| (m.text.clone(), m.meta.clone()))
            .collect()
    }

    mod submit {
        use super::*;

        #[test]
        fn question_produces_user_then_bot_bubble() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer(
                "UAS dimulai 6 Januari.",
                "abcdef123456",
            ))]));

            assert_eq!(ctl.submit("Kapan jadwal UAS?"), SubmitOutcome::Answered);

            let messages: Vec<_> = ctl.sink().messages().collect();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].role, Role::User);
            assert_eq!(messages[0].text, "Kapan jadwal UAS?");
            assert_eq!(messages[1].role, Role::Bot);
            assert_eq!(messages[1].text, "UAS dimulai 6 Januari.");
            assert_eq!(ctl.sink().typing_count(), 0);
            assert!(ctl.composer().send_enabled());
            assert_eq!(ctl.phase(), Phase::Idle);
        }

        #[test]
        fn reply_meta_is_carried_to_badges() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer("ok", "s"))]));
            ctl.submit("halo");

            let (_, meta) = bot_messages(ctl.sink()).pop().unwrap();
            assert_eq!(meta, MessageMeta::new("database", "jadwal_uas", true));
        }

        #[test]
        fn blank_input_is_a_noop() {
            let mut ctl = controller(FakeBackend::default());

            for blank in ["", "   ", "\n\t "] {
                assert_eq!(ctl.submit(blank), SubmitOutcome::Ignored);
            }
            assert!(ctl.sink().is_empty());
            assert!(ctl.backend().requests.borrow().is_empty());
        }

        #[test]
        fn question_is_sent_verbatim_with_empty_session() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer("ok", "s1"))]));
            ctl.submit("  Jadwal kuliah 1KA01 ");

            let requests = ctl.backend().requests.borrow();
            assert_eq!(requests[0].question, "  Jadwal kuliah 1KA01 ");
            assert_eq!(requests[0].session_id, "");
        }

        #[test]
        fn later_questions_carry_the_session() {
            let mut ctl = controller(FakeBackend::replying(vec![
                Ok(answer("pertama", "session-one")),
                Ok(answer("kedua", "session-one")),
            ]));
            ctl.submit("satu");
            ctl.submit("dua");

            let requests = ctl.backend().requests.borrow();
            assert_eq!(requests[1].session_id, "session-one");
        }

        #[test]
        fn empty_answer_shows_placeholder_and_sets_session() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(ChatResponse {
                answer: Some(String::new()),
                session_id: Some("s1".to_string()),
                ..Default::default()
            })]));
            ctl.submit("halo");

            let (text, meta) = bot_messages(ctl.sink()).pop().unwrap();
            assert_eq!(text, EMPTY_ANSWER_PLACEHOLDER);
            assert_eq!(meta.has_data, Some(false));
            assert_eq!(ctl.session().current_session(), "s1");
            assert!(ctl.session().indicator().visible);
            assert_eq!(ctl.session().indicator().text, "session: s1…");
        }

        #[test]
        fn reply_without_session_keeps_existing_one() {
            let mut ctl = controller(FakeBackend::replying(vec![
                Ok(answer("a", "abcdef123456")),
                Ok(ChatResponse {
                    answer: Some("b".to_string()),
                    ..Default::default()
                }),
            ]));
            ctl.submit("satu");
            ctl.submit("dua");
            assert_eq!(ctl.session().current_session(), "abcdef123456");
        }

        #[test]
        fn network_error_shows_client_error() {
            let mut ctl = controller(FakeBackend::replying(vec![Err(BackendError::Transport(
                "connection refused".to_string(),
            ))]));

            assert_eq!(ctl.submit("halo"), SubmitOutcome::Failed);

            let (text, meta) = bot_messages(ctl.sink()).pop().unwrap();
            assert_eq!(text, CLIENT_ERROR_MESSAGE);
            assert_eq!(meta, MessageMeta::client_error());
            assert_eq!(meta.intent.as_deref(), Some("error"));
            assert!(ctl.composer().send_enabled());
            assert_eq!(ctl.sink().typing_count(), 0);
            assert!(!ctl.session().has_session());
        }

        #[test]
        fn decode_and_status_errors_also_fail_cleanly() {
            let mut ctl = controller(FakeBackend::replying(vec![
                Err(BackendError::Decode("expected value".to_string())),
                Err(BackendError::Status {
                    status: 500,
                    body: "Internal Server Error".to_string(),
                }),
            ]));
            assert_eq!(ctl.submit("satu"), SubmitOutcome::Failed);
            assert_eq!(ctl.submit("dua"), SubmitOutcome::Failed);
            assert_eq!(ctl.sink().messages().count(), 4);
            assert_eq!(ctl.phase(), Phase::Idle);
        }

        #[test]
        fn typing_is_shown_then_hidden_around_exchange() {
            let mut ctl = ChatController::new(
                FakeBackend::replying(vec![Ok(answer("jawaban", "s"))]),
                RecordingSink::default(),
                Composer::default(),
            );
            ctl.submit("tanya");

            assert_eq!(
                ctl.sink().calls,
                vec!["user:tanya", "show:1", "hide:1", "bot:jawaban"]
            );
            assert_eq!(ctl.sink().transcript.typing_count(), 0);
        }

        #[test]
        fn every_request_gets_its_own_typing_token() {
            let mut ctl = ChatController::new(
                FakeBackend::replying(vec![Ok(answer("a", "s")), Ok(answer("b", "s"))]),
                RecordingSink::default(),
                Composer::default(),
            );
            ctl.submit("satu");
            ctl.submit("dua");

            assert!(ctl.sink().calls.contains(&"show:2".to_string()));
            assert!(ctl.sink().calls.contains(&"hide:2".to_string()));
        }

        #[test]
        fn submit_clears_composer() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer("ok", "s"))]));
            for c in "halo".chars() {
                ctl.handle_key(Key::Char(c));
            }
            ctl.submit("halo");
            assert_eq!(ctl.composer().text(), "");
            assert_eq!(ctl.composer().rows(), 1);
        }

        #[test]
        fn quick_ask_sends_preset() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer("ok", "s"))]));
            assert_eq!(ctl.quick_ask("Kapan jadwal UAS?"), SubmitOutcome::Answered);
            assert_eq!(
                ctl.backend().requests.borrow()[0].question,
                "Kapan jadwal UAS?"
            );
        }
    }

    mod keys {
        use super::*;

        #[test]
        fn enter_submits_composer_text() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer("ok", "s"))]));
            for c in "halo".chars() {
                assert_eq!(ctl.handle_key(Key::Char(c)), None);
            }
            assert_eq!(
                ctl.handle_key(Key::Enter { shift: false }),
                Some(SubmitOutcome::Answered)
            );
            assert_eq!(ctl.backend().requests.borrow()[0].question, "halo");
        }

        #[test]
        fn shift_enter_does_not_submit() {
            let mut ctl = controller(FakeBackend::default());
            ctl.handle_key(Key::Char('a'));
            assert_eq!(ctl.handle_key(Key::Enter { shift: true }), None);
            ctl.handle_key(Key::Char('b'));

            assert_eq!(ctl.composer().text(), "a\nb");
            assert!(ctl.backend().requests.borrow().is_empty());
        }

        #[test]
        fn enter_on_whitespace_clears_composer() {
            let mut ctl = controller(FakeBackend::default());
            for c in "   ".chars() {
                ctl.handle_key(Key::Char(c));
            }
            assert_eq!(
                ctl.handle_key(Key::Enter { shift: false }),
                Some(SubmitOutcome::Ignored)
            );
            assert_eq!(ctl.composer().text(), "");
            assert!(ctl.backend().requests.borrow().is_empty());
        }

        #[test]
        fn enter_on_empty_composer_is_ignored() {
            let mut ctl = controller(FakeBackend::default());
            assert_eq!(
                ctl.handle_key(Key::Enter { shift: false }),
                Some(SubmitOutcome::Ignored)
            );
            assert!(ctl.sink().is_empty());
        }
    }

    mod new_chat {
        use super::*;

        #[test]
        fn without_session_just_reloads() {
            let mut ctl = controller(FakeBackend::default());
            assert_eq!(ctl.new_chat(), NewChatOutcome::Reloaded);
            assert!(ctl.backend().cleared.borrow().is_empty());
        }

        #[test]
        fn with_session_clears_backend_then_reloads() {
            let mut ctl = controller(FakeBackend::replying(vec![Ok(answer("ok", "sess-42"))]));
            ctl.submit("halo");

            assert_eq!(ctl.new_chat(), NewChatOutcome::ClearedAndReloaded);
            assert_eq!(*ctl.backend().cleared.borrow(), vec!["sess-42".to_string()]);
            assert!(ctl.sink().is_empty());
            assert!(!ctl.session().has_session());
            assert!(!ctl.session().indicator().visible);
        }

        #[test]
        fn clear_failure_does_not_block_reload() {
            let mut backend = FakeBackend::replying(vec![Ok(answer("ok", "sess-42"))]);
            backend.clear_fails = true;
            let mut ctl = controller(backend);
            ctl.submit("halo");

            assert_eq!(ctl.new_chat(), NewChatOutcome::ClearedAndReloaded);
            assert!(ctl.sink().is_empty());
            assert!(!ctl.session().has_session());
        }

        #[test]
        fn next_question_after_reset_starts_new_session() {
            let mut ctl = controller(FakeBackend::replying(vec![
                Ok(answer("a", "old-session")),
                Ok(answer("b", "new-session")),
            ]));
            ctl.submit("satu");
            ctl.new_chat();
            ctl.submit("dua");

            let requests = ctl.backend().requests.borrow();
            assert_eq!(requests[1].session_id, "");
            assert_eq!(ctl.session().current_session(), "new-session");
        }
    }

    mod health {
        use super::*;

        #[test]
        fn success_renders_summary() {
            let backend = FakeBackend {
                health: Some(HealthSnapshot {
                    status: Some("healthy".to_string()),
                    active_sessions: Some(2),
                    pinecone_status: Some("connected".to_string()),
                    pinecone_vectors: Some(812),
                    db_status: Some("ok".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            let mut ctl = controller(backend);

            assert_eq!(ctl.health_check(), HealthOutcome::Reported);
            let (text, meta) = bot_messages(ctl.sink()).pop().unwrap();
            assert!(text.starts_with("**Health Check**"));
            assert!(text.contains("• Pinecone: connected (vectors: 812)"));
            assert_eq!(meta, MessageMeta::new("system", "health", true));
        }

        #[test]
        fn failure_renders_client_error() {
            let mut ctl = controller(FakeBackend::default());

            assert_eq!(ctl.health_check(), HealthOutcome::Failed);
            let (text, meta) = bot_messages(ctl.sink()).pop().unwrap();
            assert_eq!(text, HEALTH_ERROR_MESSAGE);
            assert_eq!(meta, MessageMeta::client_error());
        }

        #[test]
        fn health_does_not_touch_session() {
            let mut ctl = controller(FakeBackend::default());
            ctl.health_check();
            assert!(!ctl.session().has_session());
            assert!(matches!(ctl.sink().last(), Some(Entry::Message(_))));
        }
    }
}
