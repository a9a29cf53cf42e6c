//! Command parsing.
//!
//! Parsing is pure: the prefix has already been stripped and nothing here
//! touches program state. Command names are case-insensitive.

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    /// Changes program state; subject to the instructor gate when enabled.
    pub mutates: bool,
}

const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        name: "status",
        usage: "status",
        description: "system status",
        mutates: false,
    },
    CommandSpec {
        name: "phase",
        usage: "phase",
        description: "advance phase",
        mutates: true,
    },
    CommandSpec {
        name: "level",
        usage: "level",
        description: "advance level",
        mutates: true,
    },
    CommandSpec {
        name: "grade",
        usage: "grade Name_Lastname | Score",
        description: "record an evaluation",
        mutates: true,
    },
    CommandSpec {
        name: "summary",
        usage: "summary",
        description: "evaluation summary",
        mutates: false,
    },
    CommandSpec {
        name: "reset-demo",
        usage: "reset-demo",
        description: "reset program data",
        mutates: true,
    },
    CommandSpec {
        name: "help",
        usage: "help",
        description: "list commands",
        mutates: false,
    },
];

#[must_use]
pub fn help_text(prefix: char) -> String {
    let mut out = String::from("🧪 **Training System Commands**\n");
    for spec in COMMAND_SPECS {
        out.push_str(&format!("\n{prefix}{} → {}", spec.usage, spec.description));
    }
    out
}

/// Parsed command with typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Phase,
    Level,
    /// Raw submission, tokens re-joined with single spaces.
    Grade(String),
    Summary,
    ResetDemo,
    Help,
    Unknown(String),
    Empty,
}

impl Command {
    /// Parse the text that followed the prefix.
    ///
    /// Tokens are separated by runs of spaces. The first token names the
    /// command; any further tokens are arguments.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let mut tokens = body.trim().split(' ').filter(|t| !t.is_empty());
        let Some(name) = tokens.next() else {
            return Command::Empty;
        };

        match name.to_lowercase().as_str() {
            "status" => Command::Status,
            "phase" => Command::Phase,
            "level" => Command::Level,
            "grade" => Command::Grade(tokens.collect::<Vec<_>>().join(" ")),
            "summary" => Command::Summary,
            "reset-demo" => Command::ResetDemo,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Command::Status => "status",
            Command::Phase => "phase",
            Command::Level => "level",
            Command::Grade(_) => "grade",
            Command::Summary => "summary",
            Command::ResetDemo => "reset-demo",
            Command::Help => "help",
            Command::Unknown(_) | Command::Empty => return None,
        };
        Some(name)
    }

    #[must_use]
    pub fn mutates(&self) -> bool {
        self.name()
            .and_then(|name| COMMAND_SPECS.iter().find(|spec| spec.name == name))
            .is_some_and(|spec| spec.mutates)
    }
}

#[cfg(test)]
mod tests {
    use super::{COMMAND_SPECS, Command, help_text};

    #[test]
    fn parse_simple_commands() {
        assert_eq!(Command::parse("status"), Command::Status);
        assert_eq!(Command::parse("phase"), Command::Phase);
        assert_eq!(Command::parse("level"), Command::Level);
        assert_eq!(Command::parse("summary"), Command::Summary);
        assert_eq!(Command::parse("reset-demo"), Command::ResetDemo);
        assert_eq!(Command::parse("help"), Command::Help);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Command::parse("STATUS"), Command::Status);
        assert_eq!(Command::parse("Reset-Demo"), Command::ResetDemo);
        assert_eq!(Command::parse("GrAdE A_B | 1"), Command::Grade("A_B | 1".to_string()));
    }

    #[test]
    fn parse_ignores_extra_arguments() {
        assert_eq!(Command::parse("status now please"), Command::Status);
    }

    #[test]
    fn parse_grade_rejoins_arguments() {
        assert_eq!(
            Command::parse("grade   Ana_Perez   |   15  "),
            Command::Grade("Ana_Perez | 15".to_string())
        );
        assert_eq!(Command::parse("grade"), Command::Grade(String::new()));
    }

    #[test]
    fn parse_argument_case_is_preserved() {
        assert_eq!(
            Command::parse("grade José_Muñoz | 3"),
            Command::Grade("José_Muñoz | 3".to_string())
        );
    }

    #[test]
    fn parse_empty_command() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(Command::parse("foobar"), Command::Unknown("foobar".to_string()));
        assert_eq!(Command::parse("XYZ 123"), Command::Unknown("xyz".to_string()));
    }

    #[test]
    fn mutating_commands() {
        let mutating: Vec<&str> = COMMAND_SPECS
            .iter()
            .filter(|s| s.mutates)
            .map(|s| s.name)
            .collect();
        assert_eq!(mutating, vec!["phase", "level", "grade", "reset-demo"]);
        assert!(Command::Grade(String::new()).mutates());
        assert!(!Command::Summary.mutates());
        assert!(!Command::Unknown("x".to_string()).mutates());
    }

    #[test]
    fn help_lists_every_command_with_prefix() {
        let help = help_text('?');
        for spec in COMMAND_SPECS {
            assert!(help.contains(&format!("?{}", spec.usage)), "missing {}", spec.name);
        }
    }
}
