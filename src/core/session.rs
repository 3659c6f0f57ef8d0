use tracing::{debug, warn};

use crate::core::chat_stream::{StreamMessage, StreamParams};
use crate::core::conversation::{
    Conversation, ConversationView, SubmitRejection, TurnId, TurnPhase,
};
use crate::core::message::Message;
use crate::utils::logging::LoggingState;

/// What applying a stream update did to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    /// The update belonged to a turn that is no longer active.
    Ignored,
    /// A fragment was appended to the reply.
    Updated,
    /// The turn reached a terminal phase.
    Finished(TurnPhase),
}

/// One linear conversation with the backend, driving one turn at a time.
pub struct ChatSession {
    conversation: Conversation,
    client: reqwest::Client,
    endpoint: String,
    logging: LoggingState,
}

impl ChatSession {
    pub fn new(client: reqwest::Client, endpoint: String, logging: LoggingState) -> Self {
        Self {
            conversation: Conversation::new(),
            client,
            endpoint,
            logging,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn logging(&self) -> &LoggingState {
        &self.logging
    }

    pub fn draft_mut(&mut self) -> &mut String {
        self.conversation.draft_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    /// Starts a turn for `text`. Returns the request to spawn, or `None` when
    /// the text is blank or another turn is still in flight.
    pub fn submit(&mut self, text: &str, view: &mut dyn ConversationView) -> Option<StreamParams> {
        let turn = match self.conversation.begin_turn(text, view) {
            Ok(turn) => turn,
            Err(SubmitRejection::Empty) => return None,
            Err(SubmitRejection::Busy) => {
                debug!("submission ignored while a reply is streaming");
                return None;
            }
        };

        self.log_transcript(&Message::user(text));
        debug!(%turn, "turn started");

        Some(StreamParams {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            question: text.to_string(),
            turn,
        })
    }

    /// Submits whatever is currently in the draft.
    pub fn submit_draft(&mut self, view: &mut dyn ConversationView) -> Option<StreamParams> {
        let text = self.conversation.draft().to_string();
        self.submit(&text, view)
    }

    pub fn apply_stream_message(
        &mut self,
        message: StreamMessage,
        turn: TurnId,
        view: &mut dyn ConversationView,
    ) -> TurnProgress {
        match message {
            StreamMessage::Chunk(fragment) => {
                if self.conversation.append_fragment(turn, &fragment, view) {
                    TurnProgress::Updated
                } else {
                    TurnProgress::Ignored
                }
            }
            StreamMessage::Error(failure) => {
                warn!(%turn, error = %failure, "error communicating with the backend");
                self.finish_turn(turn, TurnPhase::Failed, view)
            }
            StreamMessage::End => self.finish_turn(turn, TurnPhase::Done, view),
        }
    }

    fn finish_turn(
        &mut self,
        turn: TurnId,
        phase: TurnPhase,
        view: &mut dyn ConversationView,
    ) -> TurnProgress {
        let finished = match phase {
            TurnPhase::Failed => self.conversation.fail_turn(turn, view),
            _ => self.conversation.complete_turn(turn, view),
        };

        let Some(reply) = finished.cloned() else {
            return TurnProgress::Ignored;
        };
        debug!(%turn, ?phase, chars = reply.text.chars().count(), "turn finished");
        self.log_transcript(&reply);
        TurnProgress::Finished(phase)
    }

    fn log_transcript(&self, message: &Message) {
        if let Err(e) = self.logging.log_message(message) {
            warn!(error = %e, "failed to write transcript");
        }
    }
}
