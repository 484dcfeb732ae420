use crate::constants::{MAX_FILES_TO_SHOW, MAX_LINE_LENGTH};
use crate::message::{CandidateMessage, CommitType};
use crate::{info, status, ui, warning};
use anyhow::Result;

/// terminal result of a review; exactly one downstream consumer (the
/// executor) receives it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Accepted(CandidateMessage),
    Edited(CandidateMessage),
    Rejected,
}

/// inputs the session reacts to
#[derive(Debug, Clone)]
pub enum ReviewInput {
    Accept,
    /// replacement text for the message (subject line, or subject plus body)
    Replace(String),
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Presenting,
    Editing,
}

/// the approve/edit/reject state machine
///
/// `Presenting → {Accepted, Editing, Rejected}`; `Editing → {Accepted,
/// Editing, Rejected}`. edits without a conventional prefix get the
/// originally inferred type prepended rather than being rejected.
pub struct ReviewSession {
    state: State,
    inferred: CommitType,
    current: CandidateMessage,
}

impl ReviewSession {
    pub fn new(candidate: CandidateMessage) -> Self {
        ReviewSession {
            state: State::Presenting,
            inferred: candidate.kind,
            current: candidate,
        }
    }

    pub fn message(&self) -> &CandidateMessage {
        &self.current
    }

    /// advance the machine; `Some` is terminal
    pub fn apply(&mut self, input: ReviewInput) -> Option<ReviewOutcome> {
        match input {
            ReviewInput::Accept => Some(match self.state {
                State::Presenting => ReviewOutcome::Accepted(self.current.clone()),
                State::Editing => ReviewOutcome::Edited(self.current.clone()),
            }),
            ReviewInput::Reject => Some(ReviewOutcome::Rejected),
            ReviewInput::Replace(text) => {
                self.state = State::Editing;
                let mut replacement = CandidateMessage::parse(&text);
                if replacement.kind == CommitType::Other && self.inferred != CommitType::Other {
                    replacement.kind = self.inferred;
                }
                self.current = replacement;
                None
            }
        }
    }

    #[cfg(test)]
    fn is_editing(&self) -> bool {
        self.state == State::Editing
    }
}

/// interactive driver: show the candidate, collect a decision
///
/// `edit` replaces the subject line, `body` opens $EDITOR on the whole
/// message. both loop back for another decision on the updated text.
pub fn review(candidate: CandidateMessage, file_lines: &[String]) -> Result<ReviewOutcome> {
    let mut session = ReviewSession::new(candidate);

    loop {
        display(session.message(), file_lines);

        let input = match ui::prompt(&["YES", "no", "edit", "body"])? {
            'y' => ReviewInput::Accept,
            'n' => ReviewInput::Reject,
            'e' => {
                info!();
                let line = ui::edit_one_line(&session.message().summary())?;
                if line.trim().is_empty() {
                    warning!("empty message, keeping the previous one");
                    continue;
                }
                ReviewInput::Replace(line)
            }
            'b' => match ui::edit_multi_line(&session.message().render()) {
                Ok(text) if !text.trim().is_empty() => ReviewInput::Replace(text),
                Ok(_) => {
                    warning!("empty message, keeping the previous one");
                    continue;
                }
                Err(e) => {
                    warning!("{}", e);
                    continue;
                }
            },
            _ => continue,
        };

        if let Some(outcome) = session.apply(input) {
            return Ok(outcome);
        }
        status!("updating...");
    }
}

/// print the candidate message and the files it covers
fn display(message: &CandidateMessage, file_lines: &[String]) {
    use colored::Colorize;
    use std::io::{self, Write};

    // highlight everything past the line budget in red
    let _ = writeln!(io::stdout());
    for line in message.render().lines() {
        if line.len() <= MAX_LINE_LENGTH {
            let _ = writeln!(io::stdout(), "{line}");
        } else {
            let mut cut = MAX_LINE_LENGTH;
            while cut > 0 && !line.is_char_boundary(cut) {
                cut -= 1;
            }
            let (head, overflow) = line.split_at(cut);
            let _ = writeln!(io::stdout(), "{head}{}", overflow.red());
        }
    }
    let _ = writeln!(io::stdout());

    status!("files:");
    for line in file_lines.iter().take(MAX_FILES_TO_SHOW) {
        info!("{}", line);
    }
    if file_lines.len() > MAX_FILES_TO_SHOW {
        info!("(+{} more)", file_lines.len() - MAX_FILES_TO_SHOW);
    }
    info!();
}
