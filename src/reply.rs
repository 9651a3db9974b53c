/// an outbound action produced by the bot logic, executed by the transport adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// plain or HTML text; `quote` answers the triggering message directly
    Text { text: String, html: bool, quote: bool },
    /// replaces the text of the message that carried the role buttons
    EditPrompt { text: String, html: bool },
    /// text followed by the translator/client inline keyboard
    RoleChoice { text: String },
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            html: false,
            quote: false,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            html: true,
            quote: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            html: false,
            quote: true,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Text { text, .. } | Reply::EditPrompt { text, .. } | Reply::RoleChoice { text } => {
                text
            }
        }
    }
}
