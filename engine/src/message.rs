//! Transport-neutral message and reply types.

use std::fmt;

/// A chat message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author_id: String,
    pub author_is_bot: bool,
    pub guild_id: Option<String>,
    pub content: String,
    /// Supplied by the transport (e.g. from the author's roles). Only consulted
    /// when mutations are restricted.
    pub is_instructor: bool,
}

impl IncomingMessage {
    pub fn new(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            author_is_bot: false,
            guild_id: None,
            content: content.into(),
            is_instructor: false,
        }
    }

    #[must_use]
    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    #[must_use]
    pub fn from_instructor(mut self) -> Self {
        self.is_instructor = true;
        self
    }

    #[must_use]
    pub fn from_bot(mut self) -> Self {
        self.author_is_bot = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Structured reply for transports that can render cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            footer: None,
        }
    }

    #[must_use]
    pub fn inline_field(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.to_string(),
            inline: true,
        });
        self
    }

    #[must_use]
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(content.into())
    }
}

/// Plain-text rendering, for transports without embed support.
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Text(text) => f.write_str(text),
            Reply::Embed(embed) => {
                f.write_str(&embed.title)?;
                for field in &embed.fields {
                    write!(f, "\n{}: {}", field.name, field.value)?;
                }
                if let Some(footer) = &embed.footer {
                    write!(f, "\n_{footer}_")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Embed, Reply};

    #[test]
    fn embed_renders_as_lines() {
        let reply = Reply::Embed(
            Embed::new("Title")
                .inline_field("Level", 2)
                .inline_field("Phase", "CLOSED")
                .footer("note"),
        );
        assert_eq!(reply.to_string(), "Title\nLevel: 2\nPhase: CLOSED\n_note_");
    }

    #[test]
    fn text_renders_verbatim() {
        assert_eq!(Reply::text("hi\nthere").to_string(), "hi\nthere");
    }
}
