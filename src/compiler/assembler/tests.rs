#[cfg(test)]
mod tests {
    use crate::compiler::arch::{Word, WordSize};
    use crate::compiler::semantics::LinkError;
    use crate::compiler::{compile, CompileOutput, Diagnostic, Source, Stage};

    fn assemble(text: &str) -> CompileOutput {
        match compile(&Source::new(text), WordSize::default()) {
            Ok(out) => out,
            Err(diags) => panic!("Compiling {:?} failed: {:?}", text, diags),
        }
    }

    fn words(text: &str) -> Vec<Word> {
        assemble(text).output.words
    }

    #[test]
    fn test_instruction_encoding() {
        for (text, expected) in vec![
            ("a = b", vec![256 + 176 + 6]),
            ("a = 5", vec![256 + 240 + 6, 5]),
            ("mem 3 = stack 4", vec![256 + 128 + 1, 4, 3]),
            ("push = stackptr 1", vec![256 + 224 + 5, 1]),
            ("out = sum", vec![256 + 16 + 13]),
            ("?a", vec![128 + 4]),
            ("?!|abZ", vec![128 + 64 + 32 + 4 + 2 + 16]),
            ("?C", vec![128 + 8]),
            ("!halt", vec![65]),
            ("!done", vec![66]),
            ("!pause", vec![67]),
            ("!pop", vec![88]),
            ("+a", vec![64 + 4]),
            ("-b", vec![64 + 8 + 1]),
            ("!c", vec![64 + 12 + 2]),
            ("<d", vec![64 + 16 + 3]),
            (">a", vec![64 + 20]),
        ] {
            assert_eq!(words(text), expected, "{}", text);
        }
    }

    #[test]
    fn test_forward_reference() {
        let out = assemble("pc = :end\nend: !done");
        assert_eq!(out.output.words, vec![256 + 240 + 12, 2, 66]);
    }

    #[test]
    fn test_macro_equivalence() {
        assert_eq!(words("#define INC X { +X }\nINC(a)"), words("+a"));
        assert_eq!(
            words("#define MOV D S { D = S }\nMOV(a 5) MOV(out sum)"),
            words("a = 5 out = sum")
        );
    }

    #[test]
    fn test_determinism() {
        let text = "
            #define DEC X { -X }
            a = 5; b = a
            loop: ?b pc = :end
            DEC(b)
            out = [1 2 3]
            pc = :loop
            end: !done
            msg: \"done\"
        ";
        let first = assemble(text).output;
        let second = assemble(text).output;
        assert_eq!(first.words, second.words);
        assert_eq!(first.symbols, second.symbols);
    }

    #[test]
    fn test_named_data_is_placed_once() {
        let out = assemble("a = :msg\nb = :msg\n!halt\nmsg: \"hi\"");
        assert_eq!(
            out.output.words,
            vec![256 + 240 + 6, 5, 256 + 240 + 7, 5, 65, 104, 105, 0]
        );
    }

    #[test]
    fn test_inline_data() {
        let out = assemble("a = \"ok\"\nb = [1 [2 3]]~4");
        assert_eq!(
            out.output.words,
            vec![256 + 240 + 6, 4, 256 + 240 + 7, 7, 111, 107, 0, 1, 2, 3, 0]
        );
    }

    #[test]
    fn test_data_referencing_data() {
        let out = assemble("a = :tbl\n!halt\ntbl: [:msg :msg]\nmsg: \"x\"");
        assert_eq!(out.output.words, vec![256 + 240 + 6, 3, 65, 5, 5, 120, 0]);
    }

    #[test]
    fn test_padded_string() {
        let out = assemble("a = :s\ns: \"ab\"~4");
        assert_eq!(out.output.words, vec![256 + 240 + 6, 2, 97, 98, 0, 0, 0]);
    }

    #[test]
    fn test_unreferenced_data_is_not_emitted() {
        assert_eq!(words("!halt\nunused: [1 2 3]"), vec![65]);
    }

    #[test]
    fn test_numbers_are_masked() {
        assert_eq!(words("a = 600"), vec![256 + 240 + 6, 600 & 511]);
    }

    #[test]
    fn test_wider_words() {
        let out = compile(&Source::new("a = 600"), WordSize::new(12).unwrap()).unwrap();
        assert_eq!(out.output.words, vec![256 + 240 + 6, 600]);
        assert_eq!(out.output.word_bits, 12);
    }

    #[test]
    fn test_program_too_large() {
        let diags = compile(&Source::new("a = :d\nd: [0]~600"), WordSize::default()).unwrap_err();
        assert_eq!(diags.len(), 1);
        match &diags[0] {
            Diagnostic::Link(e) => assert_eq!(*e.inner(), LinkError::ProgramTooLarge(602, 512)),
            d => panic!("Unexpected diagnostic {:?}", d),
        }
        assert_eq!(diags[0].stage(), Stage::Assembler);
    }

    #[test]
    fn test_symbols_and_addresses() {
        let out = assemble("start: a = 1\n#push inner: !pause #pop\nend: !done\nmsg: \"x\" b = :msg").output;
        let symbols: Vec<(&str, Word)> = out
            .symbols
            .iter()
            .map(|s| (s.label.as_str(), s.address))
            .collect();
        assert_eq!(
            symbols,
            vec![("0!start", 0), ("0.1!inner", 2), ("0!end", 3), ("0!msg", 6)]
        );
        assert_eq!(out.symbol("0!end").unwrap().position.line, 2);

        let end = out.statement_at(3).unwrap();
        assert_eq!(out.address_of(end), Some(3));
        assert_eq!(out.statement_at(1), out.statement_at(0));
        assert_eq!(out.statement_at(100), None);
    }

    #[test]
    fn test_diagnostics_from_every_stage() {
        let diags = compile(
            &Source::new("a = @\nINC(a)\n#pop\npc = :nowhere"),
            WordSize::default(),
        )
        .unwrap_err();
        let mut stages: Vec<Stage> = diags.iter().map(|d| d.stage()).collect();
        stages.dedup();
        assert_eq!(
            stages,
            vec![Stage::Lexer, Stage::Macros, Stage::Parser, Stage::Semantics]
        );
    }

    #[test]
    fn test_annotations_are_returned() {
        let out = assemble("#define INC X { +X }\nINC(a)");
        assert!(!out.annotations.is_empty());
        assert!(out.annotations.iter().any(|a| a.text == "INC(X)"));
    }
}
