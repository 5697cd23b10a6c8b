use super::{ParserError, ParserResult};
use crate::compiler::lexer::{Token, TokenKind};
use crate::compiler::source::Span;

pub struct TokenStream<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> TokenStream<'a> {
        TokenStream { tokens, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    pub fn next_if(&mut self, test: TokenKind) -> Option<&'a Token> {
        if self.test_if(test) {
            self.next()
        } else {
            None
        }
    }

    pub fn next_must_be(&mut self, test: TokenKind) -> ParserResult<&'a Token> {
        match self.peek() {
            Some(t) if t.token_eq(test) => {
                self.index += 1;
                Ok(t)
            }
            Some(t) => err!(t.span, ParserError::ExpectedButFound(vec![test], Some(t.kind))),
            None => err!(self.end_span(), ParserError::ExpectedButFound(vec![test], None)),
        }
    }

    pub fn next_if_one_of(&mut self, set: &[TokenKind]) -> Option<&'a Token> {
        if self.test_if_one_of(set) {
            self.next()
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    pub fn test_if(&self, test: TokenKind) -> bool {
        match self.peek() {
            None => false,
            Some(t) => t.token_eq(test),
        }
    }

    pub fn test_if_one_of(&self, set: &[TokenKind]) -> bool {
        match self.peek() {
            None => false,
            Some(t) => set.iter().any(|k| t.token_eq(*k)),
        }
    }

    /// A zero length span just past the last token
    pub fn end_span(&self) -> Span {
        match self.tokens.last() {
            Some(t) => Span::new(t.span.to(), t.span.to()),
            None => Span::zero(),
        }
    }
}
