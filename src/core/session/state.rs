use std::fmt;

/// Where a command session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing happened yet
    Idle,
    /// Acquiring and configuring the device
    Opening,
    /// Command sent, waiting for the device to echo it
    EchoWait,
    /// Echo seen, streaming response lines until the prompt
    ResponseCollect,
    /// Prompt seen after the response
    Done,
    /// A fatal error ended the session
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Done | SessionState::Failed)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, Opening) | (Idle, EchoWait) | (Opening, EchoWait) => true,
            (EchoWait, ResponseCollect) | (ResponseCollect, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Opening => "opening",
            SessionState::EchoWait => "echo-wait",
            SessionState::ResponseCollect => "response-collect",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}
