use bedrock_errors::FoundationError;
use std::borrow::Cow;

/// Errors that can occur during logger initialization.
#[bedrock_derive::bedrock_error]
pub enum LoggerError {
    /// The logging configuration failed validation.
    #[code = "LOGGER_INVALID_CONFIG"]
    #[error("Invalid logger configuration{}: {source}", format_context(.context))]
    InvalidConfiguration { source: FoundationError, context: Option<Cow<'static, str>> },

    /// Failure when configuring the rolling file appender (e.g., invalid path).
    #[code = "LOGGER_APPENDER"]
    #[error("Rolling file appender error{}: {source}", format_context(.context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// A global tracing subscriber has already been installed in this process.
    #[code = "LOGGER_SUBSCRIBER"]
    #[error("Tracing subscriber error{}: {source}", format_context(.context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    #[code = "LOGGER_INTERNAL"]
    #[error("Internal logger error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
