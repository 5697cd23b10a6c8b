use crate::compiler::source::{SourceIr, Span};

/// The kinds of token the lexer produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `name:`
    Label,
    /// `:name`
    Reference,
    /// A location keyword such as `a`, `sum`, or `stack`
    Location,
    Number,
    /// `=`
    Movement,
    /// A string literal.  The token text is the decoded value.
    Str,
    /// `?[!][|]targets`
    Condition,
    /// `!done`, `!pause`, `!halt`, `!pop`
    Action,
    /// An operator applied to a general register: `+a`, `<b`, `!c`
    RegisterAction,
    ArrayStart,
    ArrayEnd,
    /// `~`, the length suffix of a string or array literal
    ArrayLength,
    /// An upper case macro name
    Macro,
    MacroArgStart,
    MacroArgEnd,
    ScopePush,
    ScopePop,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        let s = match self {
            Label => "label",
            Reference => "reference",
            Location => "location",
            Number => "number",
            Movement => "=",
            Str => "string",
            Condition => "condition",
            Action => "action",
            RegisterAction => "register action",
            ArrayStart => "[",
            ArrayEnd => "]",
            ArrayLength => "~",
            Macro => "macro",
            MacroArgStart => "(",
            MacroArgEnd => ")",
            ScopePush => "#push",
            ScopePop => "#pop",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub text: String,
    pub span: Span,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, span: Span) -> Token {
        Token {
            text: text.into(),
            span,
            kind,
        }
    }

    pub fn token_eq(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl SourceIr for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Str => write!(f, "{:?}", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

/// Parses the text of a number token: decimal, `0x` hex, `0b` binary, or a
/// `'c` character code.
pub fn parse_number(text: &str) -> Option<u32> {
    if let Some(c) = text.strip_prefix('\'') {
        let mut chars = c.chars();
        let ch = chars.next()?;
        return match chars.next() {
            None => Some(ch as u32),
            Some(_) => None,
        };
    }

    if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = text.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok()
    } else {
        text.parse::<u32>().ok()
    }
}

#[cfg(test)]
mod test_numbers {
    use super::parse_number;

    #[test]
    fn number_forms() {
        for (text, expected) in [
            ("0", Some(0)),
            ("42", Some(42)),
            ("0x1F", Some(31)),
            ("0xff", Some(255)),
            ("0b101", Some(5)),
            ("'A", Some(65)),
            ("'\n", Some(10)),
            ("0x", None),
            ("99999999999", None),
        ]
        .iter()
        {
            assert_eq!(parse_number(text), *expected, "{}", text);
        }
    }
}
