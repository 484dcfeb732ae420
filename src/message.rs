use std::fmt;

/// conventional commit type token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
    /// message without a recognized conventional prefix
    Other,
}

impl CommitType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Other => "",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "feat" => Some(CommitType::Feat),
            "fix" => Some(CommitType::Fix),
            "docs" => Some(CommitType::Docs),
            "style" => Some(CommitType::Style),
            "refactor" => Some(CommitType::Refactor),
            "test" => Some(CommitType::Test),
            "chore" => Some(CommitType::Chore),
            _ => None,
        }
    }
}

/// a candidate commit message in conventional form
///
/// produced by exactly one generator per run, then owned by the review session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMessage {
    pub kind: CommitType,
    pub scope: Option<String>,
    pub subject: String,
    pub body: Option<String>,
}

impl CandidateMessage {
    pub fn new(kind: CommitType, subject: impl Into<String>) -> Self {
        CandidateMessage {
            kind,
            scope: None,
            subject: subject.into(),
            body: None,
        }
    }

    /// parse free text into conventional shape
    ///
    /// the first line is split on `type(scope): subject`; repeated prefixes
    /// (models sometimes double up, "feat: fix: ...") are stripped, keeping
    /// the innermost type token. an unrecognized leading token leaves the
    /// whole line as an `Other` subject so no text is lost. remaining lines
    /// become the body.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.trim().lines();
        let first = lines.next().unwrap_or("").trim();

        let body: String = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        let body = if body.is_empty() { None } else { Some(body) };

        let mut kind = CommitType::Other;
        let mut scope = None;
        let mut rest = first;
        while let Some((token, remainder)) = split_prefix(rest) {
            kind = token.0;
            scope = token.1;
            rest = remainder;
        }

        let subject = if kind == CommitType::Other { first } else { rest };
        CandidateMessage {
            kind,
            scope,
            subject: subject.trim().to_string(),
            body,
        }
    }

    /// first line of the rendered message
    pub fn summary(&self) -> String {
        match (self.kind, &self.scope) {
            (CommitType::Other, _) => self.subject.clone(),
            (kind, Some(scope)) => format!("{}({}): {}", kind.as_str(), scope, self.subject),
            (kind, None) => format!("{}: {}", kind.as_str(), self.subject),
        }
    }

    /// full message text as handed to `git commit`
    pub fn render(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n\n{}", self.summary(), body),
            None => self.summary(),
        }
    }
}

impl fmt::Display for CandidateMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// split one leading `type(scope):` prefix off a subject line
fn split_prefix(line: &str) -> Option<((CommitType, Option<String>), &str)> {
    let (head, rest) = line.split_once(':')?;
    let head = head.trim();

    let (token, scope) = match head.split_once('(') {
        Some((token, scope)) => {
            let scope = scope.strip_suffix(')')?;
            (token, Some(scope.trim().to_string()))
        }
        None => (head, None),
    };

    let kind = CommitType::from_token(&token.trim().to_lowercase())?;
    Some(((kind, scope), rest.trim_start()))
}
