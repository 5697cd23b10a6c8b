use log::{debug, trace};

use crate::compiler::arch::{ControlAction, VALID_ACTIONS, VALID_LOCATIONS};
use crate::compiler::macros::Macro;
use crate::compiler::source::{Position, SourceIr, Span};
use crate::compiler::CompilerError;

use super::suggest::suggest;
use super::tokens::{parse_number, Token, TokenKind};
use super::{LexerError, LexerResult};

struct LexerBranch<'a> {
    lexer: &'a mut Lexer,
    index: usize,
}

impl<'a> LexerBranch<'a> {
    fn from(l: &'a mut Lexer) -> LexerBranch<'a> {
        LexerBranch {
            index: l.index,
            lexer: l,
        }
    }

    /// Merges this branch back into it's source Lexer.  Merging has the effect
    /// of accepting the current branch as correct and updating the source lexer
    /// to match the cursor state of the branch.
    fn merge(self) -> (String, Span) {
        let cut = self.cut();
        self.lexer.index = self.index;
        cut
    }

    /// Cuts a string from the current branch from the source lexer's cursor up
    /// to where the branch cursor currently is.  This will NOT update the
    /// source.  That must be done with `merge`.
    fn cut(&self) -> (String, Span) {
        let start = self.lexer.index;
        let stop = self.index;
        let s: String = self.lexer.chars[start..stop].iter().collect();
        let span = Span::new(self.lexer.position(start), self.lexer.position(stop));
        (s, span)
    }

    /// Advances the cursor one character and returns the character that was
    /// pointed to by the cursor before the advance.  Returns None if the cursor
    /// was already at the end of the stream.
    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        Some(c)
    }

    /// Advances the cursor one character, if the next character matches the given
    /// test character.
    fn next_if(&mut self, t: char) -> bool {
        if self.peek() == Some(t) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Advances the cursor past the next character if it passes `test`.
    fn next_if_fn<F: Fn(char) -> bool>(&mut self, test: F) -> Option<char> {
        match self.peek() {
            Some(c) if test(c) => self.next(),
            _ => None,
        }
    }

    /// Will advance the cursor if the stream after the cursor starts with the
    /// given test string.  If the remaining stream does not start with the
    /// test string then the cursor is not advanced.
    fn next_if_word(&mut self, t: &str) -> bool {
        if t.chars().any(|c| c.is_whitespace()) {
            panic!("A lexical token cannot contain a whitespace character")
        }

        if self.peek_ifn(t) {
            self.index += t.chars().count();
            true
        } else {
            false
        }
    }

    /// Advances the cursor for as long as the characters pass `test` and returns
    /// how many were consumed.
    fn next_while<F: Fn(char) -> bool>(&mut self, test: F) -> usize {
        let start = self.index;
        while self.next_if_fn(&test).is_some() {}
        self.index - start
    }

    /// Returns the character pointed at by the cursor which is the next
    /// character in the stream.
    fn peek(&self) -> Option<char> {
        self.lexer.chars.get(self.index).copied()
    }

    /// Checks if the character stream from the current cursor starts with
    /// the given test string, without advancing the cursor.
    fn peek_ifn(&self, t: &str) -> bool {
        let mut i = self.index;
        for tc in t.chars() {
            match self.lexer.chars.get(i) {
                Some(c) if *c == tc => i += 1,
                _ => return false,
            }
        }
        true
    }
}

/// A `#define` whose header or body is still being read.
struct Define {
    name: Option<String>,
    params: Vec<String>,
    body: Vec<Token>,
    in_body: bool,
    span: Span,
}

/// Everything read from one compilation unit.
#[derive(Debug, Default)]
pub struct LexerOutput {
    pub tokens: Vec<Token>,
    /// Every macro defined with `#define`, in order of definition
    pub macros: Vec<Macro>,
    pub errors: Vec<CompilerError<LexerError>>,
}

/// Tokenizes `text`.
pub fn tokenize(text: &str) -> LexerOutput {
    Lexer::new(text).tokenize()
}

pub struct Lexer {
    chars: Vec<char>,
    /// The position of every character, plus the position just past the end
    positions: Vec<Position>,
    index: usize,
    define: Option<Define>,
    tokens: Vec<Token>,
    macros: Vec<Macro>,
    errors: Vec<CompilerError<LexerError>>,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        let chars: Vec<char> = text.chars().collect();
        let mut positions = Vec::with_capacity(chars.len() + 1);
        let mut pos = Position::new(0, 0);
        for c in &chars {
            positions.push(pos);
            if *c == '\n' {
                pos = Position::new(pos.line + 1, 0);
            } else {
                pos = Position::new(pos.line, pos.column + 1);
            }
        }
        positions.push(pos);

        Lexer {
            chars,
            positions,
            index: 0,
            define: None,
            tokens: vec![],
            macros: vec![],
            errors: vec![],
        }
    }

    fn position(&self, index: usize) -> Position {
        self.positions[index.min(self.chars.len())]
    }

    /// The span of the single character at `index`.
    fn span_at(&self, index: usize) -> Span {
        Span::new(self.position(index), self.position(index + 1))
    }

    /// Converts the source text into tokens, consuming the lexer.
    pub fn tokenize(mut self) -> LexerOutput {
        while self.index < self.chars.len() {
            // Record the current index position, so that we can see if the lexer
            // has advanced
            let prev_index = self.index;

            self.consume_whitespace();
            if self.index < self.chars.len() {
                match self.next_token() {
                    Ok(Some(token)) => self.emit(token),
                    Ok(None) => (),
                    Err(err) => {
                        trace!("Lexer error at {}: {:?}", err.span(), err.inner());
                        self.errors.push(err)
                    }
                }
            }

            if prev_index == self.index {
                panic!(
                    "Lexer failed to advance at {}",
                    self.position(self.index)
                )
            }
        }

        if let Some(define) = self.define.take() {
            let kind = if define.in_body {
                LexerError::UnterminatedDefineBody
            } else {
                LexerError::UnterminatedDefineHeader
            };
            self.errors.push(CompilerError::new(define.span, kind));
        }

        debug!(
            "Lexer produced {} tokens, {} macros, and {} errors",
            self.tokens.len(),
            self.macros.len(),
            self.errors.len()
        );

        LexerOutput {
            tokens: self.tokens,
            macros: self.macros,
            errors: self.errors,
        }
    }

    /// Routes a token into the define being read, or into the output.
    fn emit(&mut self, token: Token) {
        trace!("{} {} {}", token.span, token.kind, token);
        match &mut self.define {
            Some(define) if !define.in_body => {
                if token.kind == TokenKind::Macro {
                    if define.name.is_none() {
                        define.name = Some(token.text)
                    } else {
                        define.params.push(token.text)
                    }
                } else {
                    self.errors.push(CompilerError::new(
                        token.span,
                        LexerError::InvalidDefineHeader(token.text),
                    ))
                }
            }
            Some(define) => define.body.push(token),
            None => self.tokens.push(token),
        }
    }

    /// Attempt to lex the token which immediately follows from where the lexer
    /// cursor is currently pointing.  Comments and define delimiters advance
    /// the cursor without producing a token.
    fn next_token(&mut self) -> LexerResult<Option<Token>> {
        if self.consume_block_comment()?
            || self.consume_line_comment()
            || self.consume_define()?
            || self.consume_define_delimiter()?
        {
            return Ok(None);
        }

        self.consume_string()
            .transpose()
            .or_else(|| self.consume_label().transpose())
            .or_else(|| self.consume_reference().transpose())
            .or_else(|| self.consume_number().transpose())
            .or_else(|| self.consume_location().transpose())
            .or_else(|| self.consume_scope_marker().transpose())
            .or_else(|| self.consume_movement().transpose())
            .or_else(|| self.consume_condition().transpose())
            .or_else(|| self.consume_action().transpose())
            .or_else(|| self.consume_register_action().transpose())
            .or_else(|| self.consume_delimiter().transpose())
            .or_else(|| self.consume_macro_name().transpose())
            .unwrap_or_else(|| self.consume_unexpected())
            .map(Some)
    }

    /// Whitespace, commas and semicolons all separate tokens.
    fn consume_whitespace(&mut self) {
        while self.index < self.chars.len()
            && (self.chars[self.index].is_whitespace()
                || self.chars[self.index] == ','
                || self.chars[self.index] == ';')
        {
            self.index += 1;
        }
    }

    fn consume_line_comment(&mut self) -> bool {
        let mut branch = LexerBranch::from(self);
        if branch.next_if_word("//") {
            while let Some(c) = branch.next() {
                if c == '\n' {
                    break;
                }
            }

            let (_, span) = branch.merge();
            trace!("{} Line Comment", span);
            true
        } else {
            false
        }
    }

    fn consume_block_comment(&mut self) -> LexerResult<bool> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if_word("/*") {
            return Ok(false);
        }

        let mut closed = false;
        while branch.peek().is_some() {
            if branch.next_if_word("*/") {
                closed = true;
                break;
            }
            branch.next();
        }

        let (_, span) = branch.merge();
        trace!("{} Block Comment", span);
        if closed {
            Ok(true)
        } else {
            err!(span, LexerError::UnterminatedComment)
        }
    }

    /// `#define` begins the header of a macro definition.
    fn consume_define(&mut self) -> LexerResult<bool> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if_word("#define") {
            return Ok(false);
        }

        let (_, span) = branch.merge();
        if self.define.is_some() {
            return err!(span, LexerError::NestedDefine);
        }

        self.define = Some(Define {
            name: None,
            params: vec![],
            body: vec![],
            in_body: false,
            span,
        });
        Ok(true)
    }

    /// `{` ends the header of a define and `}` ends its body.
    fn consume_define_delimiter(&mut self) -> LexerResult<bool> {
        let c = match self.chars.get(self.index) {
            Some(c) if *c == '{' || *c == '}' => *c,
            _ => return Ok(false),
        };
        let span = self.span_at(self.index);
        self.index += 1;

        match (c, self.define.take()) {
            ('{', Some(mut define)) if !define.in_body => {
                define.in_body = true;
                let unnamed = define.name.is_none();
                self.define = Some(define);
                if unnamed {
                    return err!(span, LexerError::MissingMacroName);
                }
            }
            ('}', Some(define)) if define.in_body => {
                if let Some(name) = define.name {
                    debug!("Defined macro {} with {} parameters", name, define.params.len());
                    self.macros.push(Macro {
                        name,
                        params: define.params,
                        body: define.body,
                        span: Span::cover(define.span, span),
                    });
                }
            }
            (c, define) => {
                self.define = define;
                return err!(span, LexerError::UnexpectedBrace(c));
            }
        }

        Ok(true)
    }

    fn consume_string(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if('"') {
            return Ok(None);
        }

        let mut value = String::new();
        let mut closed = false;
        let mut error = None;
        while let Some(c) = branch.next() {
            match c {
                '"' => {
                    closed = true;
                    break;
                }
                '\\' => match branch.next() {
                    Some('"') => value.push('"'),
                    Some('n') => value.push('\n'),
                    Some('\\') => value.push('\\'),
                    Some(h) if h.is_ascii_hexdigit() => {
                        match (h.to_digit(16), branch.peek().and_then(|l| l.to_digit(16))) {
                            (Some(hi), Some(lo)) => {
                                branch.next();
                                value.push(char::from((hi * 16 + lo) as u8));
                            }
                            _ => {
                                error.get_or_insert(LexerError::InvalidEscapeSequence(h));
                            }
                        }
                    }
                    Some(e) => {
                        error.get_or_insert(LexerError::InvalidEscapeSequence(e));
                    }
                    None => break,
                },
                c => value.push(c),
            }
        }

        let (_, span) = branch.merge();
        if !closed {
            err!(span, LexerError::UnterminatedString)
        } else if let Some(error) = error {
            err!(span, error)
        } else {
            Ok(Some(Token::new(TokenKind::Str, &value, span)))
        }
    }

    fn is_word_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn consume_label(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if branch.next_while(Self::is_word_char) == 0 || !branch.next_if(':') {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        Ok(Some(Token::new(TokenKind::Label, &text, span)))
    }

    fn consume_reference(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if(':') || branch.next_while(Self::is_word_char) == 0 {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        Ok(Some(Token::new(TokenKind::Reference, &text, span)))
    }

    fn consume_number(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);

        if branch.next_if('\'') {
            if branch.next_if_fn(|c| c != '\n').is_none() {
                return Ok(None);
            }
        } else if branch.next_if_word("0x") {
            branch.next_while(|c| c.is_ascii_hexdigit());
        } else if branch.next_while(|c| c.is_ascii_digit()) == 0 {
            return Ok(None);
        } else if branch.cut().0 == "0" && branch.next_if('b') {
            branch.next_while(|c| c.is_ascii_digit());
        }

        let (text, span) = branch.merge();
        match parse_number(&text) {
            Some(_) => Ok(Some(Token::new(TokenKind::Number, &text, span))),
            None => err!(span, LexerError::InvalidNumber(text)),
        }
    }

    fn consume_location(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if branch.next_while(|c| c.is_ascii_lowercase()) == 0 {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        if VALID_LOCATIONS.contains(&text.as_str()) {
            Ok(Some(Token::new(TokenKind::Location, &text, span)))
        } else {
            let alternatives = suggest(&text, &VALID_LOCATIONS);
            err!(span, LexerError::UnknownLocation(text, alternatives))
        }
    }

    fn consume_scope_marker(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        let kind = if branch.next_if_word("#push") {
            TokenKind::ScopePush
        } else if branch.next_if_word("#pop") {
            TokenKind::ScopePop
        } else {
            return Ok(None);
        };

        let (text, span) = branch.merge();
        Ok(Some(Token::new(kind, &text, span)))
    }

    fn consume_movement(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if('=') {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        Ok(Some(Token::new(TokenKind::Movement, &text, span)))
    }

    /// `?[!][|][abcCZ]+`
    fn consume_condition(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if('?') {
            return Ok(None);
        }
        branch.next_if('!');
        branch.next_if('|');
        if branch.next_while(|c| "abcCZ".contains(c)) == 0 {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        Ok(Some(Token::new(TokenKind::Condition, &text, span)))
    }

    /// `!name` is a control action, unless the name is a single general
    /// register, in which case it inverts that register.
    fn consume_action(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if !branch.next_if('!') || branch.next_while(|c| c.is_ascii_lowercase()) == 0 {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        let name = &text[1..];
        if matches!(name, "a" | "b" | "c" | "d") {
            Ok(Some(Token::new(TokenKind::RegisterAction, &text, span)))
        } else if ControlAction::from_name(name).is_some() {
            Ok(Some(Token::new(TokenKind::Action, &text, span)))
        } else {
            let alternatives = suggest(name, &VALID_ACTIONS);
            err!(span, LexerError::UnknownAction(name.into(), alternatives))
        }
    }

    /// `[!+-<>][abcd]`.  Inside a macro the register may be a parameter, as in
    /// `+X`; then only the operator is taken and the parser joins it with the
    /// register the parameter expands to.
    fn consume_register_action(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if branch.next_if_fn(|c| "!+-<>".contains(c)).is_none() {
            return Ok(None);
        }
        if branch.next_if_fn(|c| "abcd".contains(c)).is_none()
            && !branch.peek().map_or(false, |c| c.is_ascii_uppercase())
        {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        Ok(Some(Token::new(TokenKind::RegisterAction, &text, span)))
    }

    fn consume_delimiter(&mut self) -> LexerResult<Option<Token>> {
        let kind = match self.chars.get(self.index) {
            Some('[') => TokenKind::ArrayStart,
            Some(']') => TokenKind::ArrayEnd,
            Some('~') => TokenKind::ArrayLength,
            Some('(') => TokenKind::MacroArgStart,
            Some(')') => TokenKind::MacroArgEnd,
            _ => return Ok(None),
        };

        let mut branch = LexerBranch::from(self);
        branch.next();
        let (text, span) = branch.merge();
        Ok(Some(Token::new(kind, &text, span)))
    }

    fn consume_macro_name(&mut self) -> LexerResult<Option<Token>> {
        let mut branch = LexerBranch::from(self);
        if branch.next_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') == 0 {
            return Ok(None);
        }

        let (text, span) = branch.merge();
        Ok(Some(Token::new(TokenKind::Macro, &text, span)))
    }

    /// Nothing matched: report the character and skip over it.
    fn consume_unexpected(&mut self) -> LexerResult<Token> {
        let span = self.span_at(self.index);
        let c = self.chars[self.index];
        self.index += 1;
        err!(span, LexerError::UnexpectedCharacter(c))
    }
}
