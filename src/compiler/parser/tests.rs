#[cfg(test)]
mod tests {
    use crate::compiler::ast::{Resolution, StatementKind};
    use crate::compiler::lexer::{tokenize, TokenKind};
    use crate::compiler::macros::expand;
    use crate::compiler::parser::{
        parse, ParserError, ParserOutput, MAX_LITERAL_DEPTH, MAX_LITERAL_LENGTH,
    };

    fn run(text: &str) -> ParserOutput {
        let lexed = tokenize(text);
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        let expanded = expand(&lexed.tokens, lexed.macros);
        assert!(expanded.errors.is_empty(), "{:?}", expanded.errors);
        parse(&expanded.tokens)
    }

    fn lines(out: &ParserOutput) -> Vec<String> {
        out.program
            .instructions()
            .map(|(id, _)| format!("{}", out.program.display(id)))
            .collect()
    }

    fn first_error(text: &str) -> ParserError {
        let out = run(text);
        assert!(!out.errors.is_empty(), "Expected an error for {}", text);
        out.errors[0].inner().clone()
    }

    #[test]
    fn test_movements() {
        for (text, expected) in vec![
            ("a = 5", "movement a = $ 5"),
            ("b = a", "movement b = a"),
            ("out = 'A", "movement out = $ 65"),
            ("a = 0x1F", "movement a = $ 31"),
            ("c = 0b101", "movement c = $ 5"),
            ("mem 3 = sum", "movement mem$ 3 = sum"),
            ("m = mem", "movement m = mem"),
            ("stack 1 = stack 2", "movement stack$ 1 = stack$ 2"),
            ("push = stackptr 1", "movement push = stackptr$ 1"),
            ("nul = zero", "movement nul = zero"),
        ] {
            let out = run(text);
            assert!(out.errors.is_empty(), "{}: {:?}", text, out.errors);
            assert_eq!(lines(&out), vec![expected], "{}", text);
        }
    }

    #[test]
    fn test_movement_widths() {
        for (text, width) in vec![
            ("a = b", 1),
            ("a = 5", 2),
            ("mem 3 = b", 2),
            ("mem 3 = stack 4", 3),
        ] {
            let out = run(text);
            let (_, stmt) = out.program.instructions().next().unwrap();
            assert_eq!(stmt.kind.width(), width, "{}", text);
        }
    }

    #[test]
    fn test_conditions_and_actions() {
        for (text, expected) in vec![
            ("?a", "condition a"),
            ("?ba", "condition b a"),
            ("?aa", "condition a"),
            ("?!Z", "condition inv Z"),
            ("?|CZ", "condition or C Z"),
            ("?!|abc", "condition inv or a b c"),
            ("!done", "action done"),
            ("!pop", "action pop"),
            ("!a", "registerAction ! a"),
            ("+b", "registerAction + b"),
            ("-c", "registerAction - c"),
            ("<d", "registerAction < d"),
            (">a", "registerAction > a"),
        ] {
            let out = run(text);
            assert!(out.errors.is_empty(), "{}: {:?}", text, out.errors);
            assert_eq!(lines(&out), vec![expected], "{}", text);
        }
    }

    #[test]
    fn test_register_action_from_macro_parameter() {
        let out = run("#define INC X { +X }\nINC(c) #define NOT R { !R } NOT(d)");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(
            lines(&out),
            vec!["registerAction + c", "registerAction ! d"]
        );
    }

    #[test]
    fn test_register_action_needs_register() {
        let out = run("#define INC X { +X }\nINC(sum)");
        assert_eq!(
            *out.errors[0].inner(),
            ParserError::InvalidRegisterActionTarget(Some("sum".into()))
        );
    }

    #[test]
    fn test_labels_and_references() {
        let out = run("loop: a = 1\npc = :loop");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(
            lines(&out),
            vec!["loop: movement a = $ 1", "movement pc = $ :0!loop"]
        );
        assert!(out.program.label("0!loop").is_some());
    }

    #[test]
    fn test_scoped_labels() {
        let out = run("#push loop: !done #push pc = :loop #pop #pop pc = :loop");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert!(out.program.label("0.1!loop").is_some());
        assert!(out.program.label("0!loop").is_none());

        let prefixes: Vec<Vec<u32>> = out
            .program
            .references()
            .map(|(_, r)| match &r.resolution {
                Resolution::Unresolved { scope_prefix } => scope_prefix.clone(),
                Resolution::Resolved(_) => panic!("The parser does not resolve references"),
            })
            .collect();
        assert_eq!(prefixes, vec![vec![0, 1, 1], vec![0]]);
    }

    #[test]
    fn test_constants() {
        let out = run("msg: \"hi\"~4 arr: [1 [2 3] :arr]~5 a = :msg");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(lines(&out), vec!["movement a = $ :0!msg"]);

        let msg = out.program.label("0!msg").unwrap();
        assert_eq!(
            format!("{}", out.program.display(msg)),
            "msg: constant \"hi\\0\\0\""
        );
        let arr = out.program.label("0!arr").unwrap();
        assert_eq!(
            format!("{}", out.program.display(arr)),
            "arr: constant [1 [2 3] :0!arr 0]"
        );
        match &out.program.statement(arr).kind {
            StatementKind::Constant(lit) => assert_eq!(lit.data_len(), 5),
            _ => panic!("Expected a constant"),
        }
    }

    #[test]
    fn test_length_suffix_counts_words() {
        for (text, words) in vec![
            ("t: [1 2]~2", 2),
            ("t: [1 [2 3]]~3", 3),
            ("t: [\"ab\" [1]]~6", 6),
            ("t: [[1 2]~3 4]~5", 5),
            ("t: \"ab\"~2", 3),
        ] {
            let out = run(text);
            assert!(out.errors.is_empty(), "{}: {:?}", text, out.errors);
            let t = out.program.label("0!t").unwrap();
            match &out.program.statement(t).kind {
                StatementKind::Constant(lit) => assert_eq!(lit.data_len(), words, "{}", text),
                _ => panic!("Expected a constant"),
            }
        }
    }

    #[test]
    fn test_inline_data_operand() {
        let out = run("a = \"ok\"\nb = [1 2]");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(
            lines(&out),
            vec!["movement a = $ \"ok\"", "movement b = $ [1 2]"]
        );
    }

    #[test]
    fn test_errors() {
        let literal = vec![
            TokenKind::Number,
            TokenKind::Reference,
            TokenKind::Str,
            TokenKind::ArrayStart,
        ];
        for (text, expected) in vec![
            ("#pop", ParserError::UnpairedPop),
            ("x: y: !done", ParserError::LabelledLabel("y".into())),
            ("x: !done x: !halt", ParserError::DuplicateLabel("0!x".into())),
            ("!done end:", ParserError::DanglingLabel("end".into())),
            ("[1 2]", ParserError::UnlabelledData),
            ("s: \"abc\"~2", ParserError::LengthTooShort(2, 3)),
            ("s: [1 2 3]~1", ParserError::LengthTooShort(1, 3)),
            ("s: [1 [2 3]]~2", ParserError::LengthTooShort(2, 3)),
            ("s: [\"ab\"]~2", ParserError::LengthTooShort(2, 3)),
            (
                "s: [1] ~ 3000000000",
                ParserError::LengthTooLong(3_000_000_000, MAX_LITERAL_LENGTH),
            ),
            (
                "s: \"ab\"~70000",
                ParserError::LengthTooLong(70_000, MAX_LITERAL_LENGTH),
            ),
            (
                "out 5 = a",
                ParserError::InvalidDestinationLocation("out".into(), true),
            ),
            (
                "sum = a",
                ParserError::InvalidDestinationLocation("sum".into(), false),
            ),
            (
                "a = out",
                ParserError::InvalidSourceLocation("out".into(), false),
            ),
            (
                "a b",
                ParserError::ExpectedButFound(vec![TokenKind::Movement], Some(TokenKind::Location)),
            ),
            ("5", ParserError::UnexpectedToken(TokenKind::Number)),
            ("a =", ParserError::ExpectedButFound(literal.clone(), None)),
        ] {
            assert_eq!(first_error(text), expected, "{}", text);
        }
    }

    #[test]
    fn test_parser_recovers_after_error() {
        let out = run("#pop a = 1 5 b = 2");
        assert_eq!(out.errors.len(), 2);
        assert_eq!(
            lines(&out),
            vec!["movement a = $ 1", "movement b = $ 2"]
        );
    }

    #[test]
    fn test_literal_depth_limit() {
        let depth = MAX_LITERAL_DEPTH + 8;
        let text = format!("d: {}{}", "[".repeat(depth), "]".repeat(depth));
        assert_eq!(first_error(&text), ParserError::LiteralTooDeep);
    }
}
