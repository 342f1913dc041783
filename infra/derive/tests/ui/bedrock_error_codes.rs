use bedrock_derive::bedrock_error;
use std::borrow::Cow;

#[bedrock_error]
pub enum CodedError {
    #[code = "CODED_LIMIT"]
    #[error("Limit reached{}: {message}", format_context(.context))]
    Limit { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Plain failure: {message}")]
    PlainFailure { message: Cow<'static, str> },
}

fn main() {
    let err = CodedError::PlainFailure { message: "x".into() };
    assert_eq!(err.code(), "PLAIN_FAILURE");
}
