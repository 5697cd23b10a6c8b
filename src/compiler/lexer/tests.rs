#[cfg(test)]
mod tests {
    use crate::compiler::lexer::{tokenize, LexerError, TokenKind};
    use crate::compiler::source::{Position, SourceIr, Span};
    use TokenKind::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let out = tokenize(text);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        out.tokens.iter().map(|t| t.kind).collect()
    }

    fn errors(text: &str) -> Vec<LexerError> {
        tokenize(text)
            .errors
            .into_iter()
            .map(|e| e.into_inner())
            .collect()
    }

    #[test]
    fn test_single_tokens() {
        for (text, kind) in [
            ("loop:", Label),
            (":loop", Reference),
            ("stack", Location),
            ("12", Number),
            ("0x1f", Number),
            ("0b101", Number),
            ("'a", Number),
            ("=", Movement),
            ("\"hi\"", Str),
            ("?!|abC", Condition),
            ("?Z", Condition),
            ("!done", Action),
            ("!pop", Action),
            ("+a", RegisterAction),
            ("-d", RegisterAction),
            ("<b", RegisterAction),
            (">c", RegisterAction),
            ("!a", RegisterAction),
            ("[", ArrayStart),
            ("]", ArrayEnd),
            ("~", ArrayLength),
            ("INC_2", Macro),
            ("(", MacroArgStart),
            (")", MacroArgEnd),
            ("#push", ScopePush),
            ("#pop", ScopePop),
        ]
        .iter()
        {
            assert_eq!(kinds(text), vec![*kind], "{}", text);
        }
    }

    #[test]
    fn test_movement_statement() {
        assert_eq!(
            kinds("loop: ?b pc=:loopEnd; -b; out=sub"),
            vec![
                Label, Condition, Location, Movement, Reference, RegisterAction, Location,
                Movement, Location
            ]
        );
    }

    #[test]
    fn test_separators_and_comments() {
        assert_eq!(
            kinds("a = 1, b = 2; // comment = 3\n/* c = 4 */ !done"),
            vec![Location, Movement, Number, Location, Movement, Number, Action]
        );
    }

    #[test]
    fn test_token_spans() {
        let out = tokenize("a = 5\n  !done");
        let spans: Vec<Span> = out.tokens.iter().map(|t| t.span()).collect();
        assert_eq!(
            spans,
            vec![
                Span::new(Position::new(0, 0), Position::new(0, 1)),
                Span::new(Position::new(0, 2), Position::new(0, 3)),
                Span::new(Position::new(0, 4), Position::new(0, 5)),
                Span::new(Position::new(1, 2), Position::new(1, 7)),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let out = tokenize(r#""a\"b\n\41\\""#);
        assert!(out.errors.is_empty());
        assert_eq!(out.tokens[0].text, "a\"b\nA\\");
    }

    #[test]
    fn test_invalid_escape() {
        assert_eq!(errors(r#""a\qb" !done"#), vec![LexerError::InvalidEscapeSequence('q')]);
        // lexing continues after the bad string
        assert_eq!(tokenize(r#""a\qb" !done"#).tokens.len(), 1);
    }

    #[test]
    fn test_unterminated_constructs() {
        for (text, expected) in [
            ("\"abc", LexerError::UnterminatedString),
            ("/* abc", LexerError::UnterminatedComment),
            ("#define INC X", LexerError::UnterminatedDefineHeader),
            ("#define INC X { +X", LexerError::UnterminatedDefineBody),
        ]
        .iter()
        {
            assert_eq!(errors(text), vec![expected.clone()], "{}", text);
        }
    }

    #[test]
    fn test_unknown_location_suggests() {
        assert_eq!(
            errors("stak = a"),
            vec![LexerError::UnknownLocation("stak".into(), vec!["stack".into()])]
        );
    }

    #[test]
    fn test_unknown_action_suggests() {
        assert_eq!(
            errors("!paus"),
            vec![LexerError::UnknownAction("paus".into(), vec!["pause".into()])]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let out = tokenize("a = 5 @ !done");
        assert_eq!(
            out.errors
                .into_iter()
                .map(|e| e.into_inner())
                .collect::<Vec<_>>(),
            vec![LexerError::UnexpectedCharacter('@')]
        );
        assert_eq!(out.tokens.len(), 4);
    }

    #[test]
    fn test_number_overflow() {
        assert_eq!(
            errors("a = 99999999999"),
            vec![LexerError::InvalidNumber("99999999999".into())]
        );
    }

    #[test]
    fn test_define_is_captured() {
        let out = tokenize("#define INC X { +X }\nINC(a)");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.macros.len(), 1);
        let m = &out.macros[0];
        assert_eq!(m.name, "INC");
        assert_eq!(m.params, vec!["X".to_string()]);
        assert_eq!(
            m.body.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["+", "X"]
        );
        assert_eq!(
            out.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Macro, MacroArgStart, Location, MacroArgEnd]
        );
    }

    #[test]
    fn test_define_errors() {
        for (text, expected) in [
            ("#define { a = 1 }", LexerError::MissingMacroName),
            ("#define M a { a = 1 }", LexerError::InvalidDefineHeader("a".into())),
            ("#define M { #define N { } }", LexerError::NestedDefine),
            ("}", LexerError::UnexpectedBrace('}')),
        ]
        .iter()
        {
            assert!(errors(text).contains(expected), "{}: {:?}", text, errors(text));
        }
    }

    #[test]
    fn test_register_action_on_parameter() {
        let out = tokenize("#define NOT X { !X +X }");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(
            out.macros[0]
                .body
                .iter()
                .map(|t| (t.kind, t.text.as_str()))
                .collect::<Vec<_>>(),
            vec![
                (RegisterAction, "!"),
                (Macro, "X"),
                (RegisterAction, "+"),
                (Macro, "X")
            ]
        );
    }
}
