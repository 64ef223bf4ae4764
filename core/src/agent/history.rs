use serde::Serialize;

pub const DEFAULT_MAX_HISTORY: usize = 10;
pub const ERROR_REPORT_NAME: &str = "error_report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
    ToolResult,
    ErrorReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub name: Option<String>,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            name: None,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            name: None,
            content: content.into(),
        }
    }

    pub fn tool_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::ToolResult,
            name: Some(name.into()),
            content: content.into(),
        }
    }

    pub fn error_report(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::ErrorReport,
            name: Some(ERROR_REPORT_NAME.to_string()),
            content: content.into(),
        }
    }
}

/// Append-only transcript capped at `max_len` turns. Appending past the cap
/// drops the oldest turns; the turn just appended always survives.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
    max_len: usize,
    version: u64,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl ConversationHistory {
    pub fn new(max_len: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_len: max_len.max(1),
            version: 0,
        }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        if self.turns.len() > self.max_len {
            let excess = self.turns.len() - self.max_len;
            self.turns.drain(..excess);
        }
        self.version += 1;
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.version += 1;
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Bumped on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_beyond_cap_drops_oldest() {
        for max in [1, 2, 5, 10] {
            let mut history = ConversationHistory::new(max);
            for i in 0..(max + 7) {
                history.push(ConversationTurn::user(format!("m{i}")));
                assert!(history.len() <= max);
                assert_eq!(history.last().map(|t| t.content.clone()), Some(format!("m{i}")));
            }
            assert_eq!(history.len(), max);
            assert_eq!(history.turns()[0].content, format!("m{}", 7));
        }
    }

    #[test]
    fn zero_cap_still_keeps_newest_turn() {
        let mut history = ConversationHistory::new(0);
        history.push(ConversationTurn::user("hi"));
        history.push(ConversationTurn::assistant("hello"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.turns()[0].role, TurnRole::Assistant);
    }

    #[test]
    fn version_tracks_mutations() {
        let mut history = ConversationHistory::default();
        assert_eq!(history.version(), 0);
        history.push(ConversationTurn::user("a"));
        history.push(ConversationTurn::tool_result("get_courses", "Courses: []"));
        history.clear();
        assert_eq!(history.version(), 3);
        assert!(history.is_empty());
    }

    #[test]
    fn error_report_turn_is_named() {
        let turn = ConversationTurn::error_report("Errors encountered:\nboom");
        assert_eq!(turn.role, TurnRole::ErrorReport);
        assert_eq!(turn.name.as_deref(), Some("error_report"));
    }
}
