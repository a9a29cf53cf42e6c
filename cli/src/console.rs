//! Console transport: every stdin line is one chat message from a fixed author.

use cohort_engine::IncomingMessage;

#[derive(Debug, Clone)]
pub struct ConsoleSession {
    pub author_id: String,
    pub guild_id: Option<String>,
    pub is_instructor: bool,
}

impl ConsoleSession {
    pub fn message(&self, line: &str) -> IncomingMessage {
        IncomingMessage {
            author_id: self.author_id.clone(),
            author_is_bot: false,
            guild_id: self.guild_id.clone(),
            content: line.trim_end_matches(['\r', '\n']).to_string(),
            is_instructor: self.is_instructor,
        }
    }
}
