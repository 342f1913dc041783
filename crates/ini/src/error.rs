use std::borrow::Cow;

/// Errors raised while reading, writing or converting INI documents.
#[bedrock_derive::bedrock_error]
pub enum IniError {
    /// The text is not valid INI syntax.
    #[code = "INI_PARSE"]
    #[error("INI parse error{}: {source}", format_context(.context))]
    Parse { source: ini::ParseError, context: Option<Cow<'static, str>> },

    #[code = "INI_IO"]
    #[error("INI I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Well-formed text or data that cannot be represented as a two-level document.
    #[code = "INI_STRUCTURE"]
    #[error("INI structure error{}: {message}", format_context(.context))]
    Structure { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl IniError {
    pub(crate) fn structure(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Structure { message: message.into(), context: None }
    }
}
