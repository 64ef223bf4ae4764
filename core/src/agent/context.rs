use crate::config::DEFAULT_SYSTEM_PROMPT;

pub const CONCISE_INSTRUCTION: &str = "Give very concise responses. Focus on only the most important information. Summarize details rather than listing everything.";

pub struct ContextBuilder {
    base_prompt: String,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl ContextBuilder {
    pub fn new(base_prompt: impl Into<String>) -> Self {
        Self {
            base_prompt: base_prompt.into(),
        }
    }

    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    /// The prompt for one model call. `concise` adds the brevity instruction
    /// for that call only; the stored base prompt never changes.
    pub fn build_system_prompt(&self, concise: bool) -> String {
        let mut parts = vec![self.base_prompt.trim_end().to_string()];
        parts.push(self.get_runtime_context());

        if concise {
            parts.push(CONCISE_INSTRUCTION.to_string());
        }

        parts.join("\n\n")
    }

    fn get_runtime_context(&self) -> String {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC (%A)");

        format!(
            "## Runtime Context

### Current Time
{}",
            timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_base_and_runtime_context() {
        let builder = ContextBuilder::new("You help students.");
        let prompt = builder.build_system_prompt(false);
        assert!(prompt.starts_with("You help students."));
        assert!(prompt.contains("### Current Time"));
        assert!(!prompt.contains(CONCISE_INSTRUCTION));
    }

    #[test]
    fn concise_instruction_does_not_stick() {
        let builder = ContextBuilder::default();
        assert!(builder.build_system_prompt(true).ends_with(CONCISE_INSTRUCTION));
        assert!(!builder.build_system_prompt(false).contains(CONCISE_INSTRUCTION));
        assert_eq!(builder.base_prompt(), DEFAULT_SYSTEM_PROMPT);
    }
}
