//! Conversation state: a frozen message log plus the reply being streamed.
//!
//! Entries in the log never change once appended. The bot placeholder of the
//! active turn lives in a separate tail slot that is the only place fragments
//! are written; completing or failing the turn merges it into the log. Every
//! mutation is followed by a call to [`ConversationView::scroll_to_latest`].

use crate::core::constants::FALLBACK_REPLY;
use crate::core::message::Message;

/// Identifies one submission. Stream updates carry it so that only the turn
/// that owns the tail can touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

impl TurnId {
    #[cfg(test)]
    pub(crate) fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    /// User message and placeholder appended, nothing received yet.
    Sent,
    /// At least one fragment has been applied to the placeholder.
    Streaming,
    Done,
    Failed,
}

impl TurnPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, TurnPhase::Sent | TurnPhase::Streaming)
    }
}

/// Why a submission did not start a turn. Both cases leave the conversation
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    Empty,
    Busy,
}

/// Post-mutation hook. Called once after every append or in-place change to
/// the visible message sequence.
pub trait ConversationView {
    fn scroll_to_latest(&mut self, conversation: &Conversation);
}

/// A view that ignores every update.
pub struct NoopView;

impl ConversationView for NoopView {
    fn scroll_to_latest(&mut self, _conversation: &Conversation) {}
}

#[derive(Debug, Clone)]
struct PendingReply {
    turn: TurnId,
    message: Message,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    log: Vec<Message>,
    tail: Option<PendingReply>,
    draft: String,
    phase: TurnPhase,
    last_turn: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            tail: None,
            draft: String::new(),
            phase: TurnPhase::Idle,
            last_turn: 0,
        }
    }

    /// All messages in display order, including the in-progress reply.
    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.log
            .iter()
            .chain(self.tail.iter().map(|pending| &pending.message))
    }

    pub fn len(&self) -> usize {
        self.log.len() + usize::from(self.tail.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        match index.cmp(&self.log.len()) {
            std::cmp::Ordering::Less => self.log.get(index),
            std::cmp::Ordering::Equal => self.tail.as_ref().map(|pending| &pending.message),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn last(&self) -> Option<&Message> {
        self.tail
            .as_ref()
            .map(|pending| &pending.message)
            .or_else(|| self.log.last())
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_in_flight()
    }

    pub fn active_turn(&self) -> Option<TurnId> {
        self.tail.as_ref().map(|pending| pending.turn)
    }

    /// Starts a turn: appends the user message, clears the draft and opens an
    /// empty bot placeholder.
    pub fn begin_turn(
        &mut self,
        text: &str,
        view: &mut dyn ConversationView,
    ) -> Result<TurnId, SubmitRejection> {
        if text.trim().is_empty() {
            return Err(SubmitRejection::Empty);
        }
        if self.is_busy() {
            return Err(SubmitRejection::Busy);
        }

        self.log.push(Message::user(text));
        self.draft.clear();
        self.phase = TurnPhase::Sent;
        view.scroll_to_latest(self);

        self.last_turn += 1;
        let turn = TurnId(self.last_turn);
        self.tail = Some(PendingReply {
            turn,
            message: Message::bot_placeholder(),
        });
        view.scroll_to_latest(self);

        Ok(turn)
    }

    /// Appends a fragment to the reply owned by `turn`. Returns `false` when
    /// the turn is not the active one or the fragment is empty.
    pub fn append_fragment(
        &mut self,
        turn: TurnId,
        fragment: &str,
        view: &mut dyn ConversationView,
    ) -> bool {
        if fragment.is_empty() {
            return false;
        }
        let Some(pending) = self.tail.as_mut().filter(|pending| pending.turn == turn) else {
            return false;
        };

        pending.message.text.push_str(fragment);
        pending.message.is_thinking = false;
        self.phase = TurnPhase::Streaming;
        view.scroll_to_latest(self);
        true
    }

    /// Freezes the reply as it stands. Returns the final message.
    pub fn complete_turn(
        &mut self,
        turn: TurnId,
        view: &mut dyn ConversationView,
    ) -> Option<&Message> {
        self.close_turn(turn, TurnPhase::Done, None, view)
    }

    /// Replaces the reply with the fallback text and freezes it.
    pub fn fail_turn(
        &mut self,
        turn: TurnId,
        view: &mut dyn ConversationView,
    ) -> Option<&Message> {
        self.close_turn(turn, TurnPhase::Failed, Some(FALLBACK_REPLY), view)
    }

    fn close_turn(
        &mut self,
        turn: TurnId,
        phase: TurnPhase,
        replacement: Option<&str>,
        view: &mut dyn ConversationView,
    ) -> Option<&Message> {
        if self.active_turn() != Some(turn) {
            return None;
        }
        let mut pending = self.tail.take()?;

        if let Some(text) = replacement {
            pending.message.text = text.to_string();
        }
        pending.message.is_thinking = false;
        self.log.push(pending.message);
        self.phase = phase;
        view.scroll_to_latest(self);
        self.log.last()
    }
}
