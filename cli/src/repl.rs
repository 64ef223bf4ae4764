use console::style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Exit,
    Reset,
    Help,
    Message(String),
}

impl ConsoleCommand {
    /// `None` for blank input. Commands must match the whole line, ignoring
    /// case only; anything else, padded commands included, is a message.
    pub fn parse(line: &str) -> Option<Self> {
        let input = line.trim();
        if input.is_empty() {
            return None;
        }

        let command = match line.to_lowercase().as_str() {
            "exit" | "quit" => ConsoleCommand::Exit,
            "reset" => ConsoleCommand::Reset,
            "help" => ConsoleCommand::Help,
            _ => ConsoleCommand::Message(input.to_string()),
        };
        Some(command)
    }
}

pub fn print_welcome() {
    println!();
    println!("{}", style("=".repeat(60)).cyan());
    println!(
        "{}",
        style("Canvas Assistant - AI-powered Canvas LMS helper")
            .cyan()
            .bold()
    );
    println!("{}", style("=".repeat(60)).cyan());
    println!("Ask questions about your courses, assignments, and deadlines.");
    println!();
    println!("{}", style("Example questions:").bold());
    println!("  - What courses am I enrolled in?");
    println!("  - What assignments are due this week?");
    println!("  - Do I have any late assignments?");
    println!("  - Give me a summary of my upcoming work.");
    println!();
    println!("{}", style("Commands:").bold());
    println!("  {}  clear the conversation history", style("reset").green());
    println!("  {}   show this message again", style("help").green());
    println!("  {}   leave the assistant (or 'quit')", style("exit").green());
    println!("{}", style("=".repeat(60)).cyan());
    println!();
}

pub fn print_response(response: &str) {
    println!();
    println!("{}", style("Canvas Assistant:").cyan().bold());
    termimad::print_text(response);
    println!();
}

pub fn print_goodbye() {
    println!(
        "\n{}",
        style("Thank you for using Canvas Assistant. Goodbye!").cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(ConsoleCommand::parse("EXIT"), Some(ConsoleCommand::Exit));
        assert_eq!(ConsoleCommand::parse("Quit"), Some(ConsoleCommand::Exit));
        assert_eq!(ConsoleCommand::parse("Reset"), Some(ConsoleCommand::Reset));
        assert_eq!(ConsoleCommand::parse("help"), Some(ConsoleCommand::Help));
    }

    #[test]
    fn padded_commands_are_messages() {
        assert_eq!(
            ConsoleCommand::parse(" quit "),
            Some(ConsoleCommand::Message("quit".into()))
        );
        assert_eq!(
            ConsoleCommand::parse("reset "),
            Some(ConsoleCommand::Message("reset".into()))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(ConsoleCommand::parse(""), None);
        assert_eq!(ConsoleCommand::parse("   \t"), None);
    }

    #[test]
    fn anything_else_is_a_message() {
        assert_eq!(
            ConsoleCommand::parse("  what's due this week?\n"),
            Some(ConsoleCommand::Message("what's due this week?".into()))
        );
        assert_eq!(
            ConsoleCommand::parse("reset my password"),
            Some(ConsoleCommand::Message("reset my password".into()))
        );
    }
}
