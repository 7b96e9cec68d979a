/// An error raised by one of the stages of compilation, tagged with the
/// source line at which the stage found it.  `IE` is the error type of the
/// stage: `LexerError`, `ParserError` or `TranslationError`.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerError<IE: std::fmt::Display> {
    line: u32,
    inner: IE,
}

impl<IE> CompilerError<IE>
where
    IE: std::fmt::Display,
{
    pub fn new(line: u32, inner: IE) -> Self {
        CompilerError { line, inner }
    }

    pub fn inner(self) -> IE {
        self.inner
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl<IE> std::fmt::Display for CompilerError<IE>
where
    IE: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}: {}", self.line, self.inner)
    }
}

impl<IE> std::error::Error for CompilerError<IE> where IE: std::fmt::Display + std::fmt::Debug {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_line() {
        let e = CompilerError::new(12, "main is not declared");
        assert_eq!(e.line(), 12);
        assert_eq!(e.to_string(), "L12: main is not declared");
        assert_eq!(e.inner(), "main is not declared");
    }
}
