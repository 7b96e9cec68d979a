use super::ParserError;
use crate::compiler::lexer::tokens::{Lex, Token};
use crate::compiler::CompilerError;

pub struct TokenStream<'a> {
    tokens: &'a Vec<Token>,
    index: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a Vec<Token>) -> TokenStream {
        TokenStream { tokens, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, i: usize) {
        self.index = i;
    }

    /// The line of the next token, or of the last token once the stream is
    /// exhausted.
    pub fn line(&self) -> u32 {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.l)
    }

    pub fn next(&mut self) -> Option<Token> {
        if self.index >= self.tokens.len() {
            None
        } else {
            self.index += 1;
            Some(self.tokens[self.index - 1].clone())
        }
    }

    pub fn next_if(&mut self, test: &Lex) -> Option<Token> {
        if self.test_if(test) {
            self.next()
        } else {
            None
        }
    }

    pub fn next_if_id(&mut self) -> Option<(u32, String)> {
        match self.next_if(&Lex::Identifier("".into())) {
            Some(Token {
                l,
                s: Lex::Identifier(id),
            }) => Some((l, id)),
            Some(_) => None,
            None => None,
        }
    }

    pub fn next_must_be(&mut self, test: &Lex) -> Result<Token, CompilerError<ParserError>> {
        let (line, found) = match self.peek() {
            Some(t) => (t.l, Some(t.s.clone())),
            None => (self.line(), None),
        };
        match self.next_if(test) {
            Some(t) => Ok(t),
            None => Err(CompilerError::new(
                line,
                ParserError::ExpectedButFound(vec![test.clone()], found),
            )),
        }
    }

    pub fn next_if_one_of(&mut self, set: Vec<Lex>) -> Option<Token> {
        if self.test_if_one_of(set) {
            self.next()
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_at(&self, i: usize) -> Option<&Token> {
        self.tokens.get(self.index + i)
    }

    pub fn test_if(&self, test: &Lex) -> bool {
        match self.peek() {
            None => false,
            Some(t) => t.token_eq(test),
        }
    }

    pub fn test_ifn(&self, test: Vec<Lex>) -> bool {
        for i in 0..test.len() {
            match self.peek_at(i) {
                None => return false,
                Some(token) => {
                    if !token.token_eq(&test[i]) {
                        return false;
                    }
                }
            }
        }

        true
    }

    pub fn test_if_one_of(&self, set: Vec<Lex>) -> bool {
        match self.peek() {
            None => false,
            Some(t) => set.iter().any(|l| t.token_eq(l)),
        }
    }
}
