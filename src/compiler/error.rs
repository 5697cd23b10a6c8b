use super::source::{Source, SourceIr, Span};

/// Represents all errors that are generated from within the Compiler
/// module and its submodules.
///
/// This type captures the metadata which is present for every error caused
/// by input source code: the span of text it was found at.  The inner error
/// holds the stage specific description of what went wrong.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerError<IE: CompilerDisplay> {
    span: Span,
    inner: IE,
}

impl<IE> CompilerError<IE>
where
    IE: CompilerDisplay,
{
    pub fn new(span: Span, inner: IE) -> Self {
        CompilerError { span, inner }
    }

    pub fn inner(&self) -> &IE {
        &self.inner
    }

    pub fn into_inner(self) -> IE {
        self.inner
    }
}

impl<IE: CompilerDisplay> SourceIr for CompilerError<IE> {
    fn span(&self) -> Span {
        self.span
    }
}

impl<IE> CompilerDisplay for CompilerError<IE>
where
    IE: CompilerDisplay,
{
    fn fmt(&self, src: &Source) -> Result<String, CompilerDisplayError> {
        let inner = self.inner.fmt(src)?;
        Ok(format!("L{}: {}", self.span.from(), inner))
    }
}

/// Formats compiler data into a message for the user.  The source is passed
/// in so that messages may quote the text they refer to.
pub trait CompilerDisplay {
    fn fmt(&self, src: &Source) -> Result<String, CompilerDisplayError>;
}

/// Errors raised while rendering a message.
#[derive(Clone, Debug, PartialEq)]
pub enum CompilerDisplayError {
    /// A span referenced text which is not in the source.
    SpanOutsideSource(Span),
}

impl std::fmt::Display for CompilerDisplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompilerDisplayError::SpanOutsideSource(span) => {
                write!(f, "Span {} is outside of the source text", span)
            }
        }
    }
}
