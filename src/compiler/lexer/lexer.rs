// Token - a type which captures the different types of tokens and which is output
// by tokenize
use stdext::function_name;

use crate::diagnostics::config::TracingConfig;

use super::super::CompilerError;
use super::tokens::{Lex, Token};
use super::{LexerError, LexerResult};
use Lex::*;

macro_rules! trace {
    ($ts:expr) => {
        if $ts.tracing.includes($ts.line() as usize) {
            println!(
                "{} <- L{}:{:?}",
                function_name!(),
                $ts.line(),
                $ts.current_char()
            )
        }
    };
}

struct LexerBranch<'a> {
    lexer: &'a mut Lexer,
    index: usize,
    line: u32,
}

impl<'a> LexerBranch<'a> {
    fn from(l: &mut Lexer) -> LexerBranch {
        LexerBranch {
            index: l.index,
            line: l.line,
            lexer: l,
        }
    }

    /// Accepts everything read by this branch and returns the text between
    /// the source lexer's cursor and the branch's cursor.
    fn merge(self) -> String {
        let s = self.lexer.chars[self.lexer.index..self.index].iter().collect();

        self.lexer.index = self.index;
        self.lexer.line = self.line;

        s
    }

    fn next(&mut self) -> Option<char> {
        if self.index < self.lexer.chars.len() {
            let c = self.lexer.chars[self.index];
            self.index += 1;
            if c == '\n' {
                self.line += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn next_if(&mut self, t: char) -> bool {
        if self.peek_if(t) {
            self.next().is_some()
        } else {
            false
        }
    }

    fn next_ifn(&mut self, t: &str) -> bool {
        if self.peek_ifn(t) {
            self.index += t.chars().count();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.lexer.chars.get(self.index).copied()
    }

    fn peek_if(&self, t: char) -> bool {
        self.peek() == Some(t)
    }

    fn peek_ifn(&self, t: &str) -> bool {
        let tc: Vec<char> = t.chars().collect();
        self.lexer.chars[self.index..].starts_with(&tc)
    }
}

pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: u32,
    tracing: TracingConfig,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        Lexer {
            chars: text.chars().collect(),
            index: 0,
            line: 1,
            tracing: TracingConfig::Off,
        }
    }

    pub fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Converts the source text into tokens. Tokenizing stops at the first
    /// error, which is the last element of the result.
    pub fn tokenize(&mut self) -> Vec<LexerResult<Token>> {
        let mut tokens = vec![];

        while self.index < self.chars.len() {
            self.consume_whitespace();
            if self.index >= self.chars.len() {
                break;
            }

            let prev_index = self.index;
            match self.next_token() {
                Ok(Some(t)) => tokens.push(Ok(t)),
                Ok(None) => (),
                Err(err) => {
                    tokens.push(Err(err));
                    break;
                }
            }

            // Can no longer consume the input text
            if prev_index == self.index {
                tokens.push(Err(CompilerError::new(
                    self.line,
                    LexerError::Locked(self.current_char()),
                )));
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> LexerResult<Option<Token>> {
        if self.consume_line_comment() || self.consume_block_comment()? {
            return Ok(None);
        }

        match self.consume_literal()? {
            Some(i) => Ok(Some(i)),
            None => match self.consume_identifier()? {
                Some(id) => Ok(Some(self.if_keyword_map(id))),
                None => self.consume_operator(),
            },
        }
    }

    fn consume_whitespace(&mut self) {
        trace!(self);
        while self.index < self.chars.len() && self.chars[self.index].is_whitespace() {
            if self.chars[self.index] == '\n' {
                self.line += 1;
            }
            self.index += 1;
        }
    }

    fn consume_line_comment(&mut self) -> bool {
        let mut branch = LexerBranch::from(self);
        if branch.next_ifn("//") {
            while let Some(c) = branch.next() {
                if c == '\n' {
                    break;
                }
            }
            branch.merge();
            true
        } else {
            false
        }
    }

    fn consume_block_comment(&mut self) -> LexerResult<bool> {
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        if branch.next_ifn("/*") {
            while !branch.next_ifn("*/") {
                if branch.next().is_none() {
                    return Err(CompilerError::new(line, LexerError::UnterminatedComment));
                }
            }
            branch.merge();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume_literal(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        match self.consume_integer()? {
            Some(i) => Ok(Some(i)),
            None => self.consume_string_literal(),
        }
    }

    fn consume_integer(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);

        if !branch.peek().map_or(false, |c| c.is_ascii_digit()) {
            return Ok(None);
        }

        while branch.peek().map_or(false, |c| c.is_ascii_digit()) {
            branch.next();
        }

        let num = branch.merge();

        // An optional `f` suffix is accepted and ignored
        let mut branch = LexerBranch::from(self);
        if branch.next_if('f') {
            branch.merge();
        }

        if self
            .current_char()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            return Err(CompilerError::new(line, LexerError::InvalidInteger));
        }

        Ok(Some(Token::new(line, Integer(num))))
    }

    fn consume_string_literal(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);

        if branch.next_if('"') {
            loop {
                match branch.next() {
                    Some('"') => break,
                    Some('\\') => {
                        // Escape sequences are passed through to the assembler
                        if branch.next().is_none() {
                            return Err(CompilerError::new(line, LexerError::UnterminatedString));
                        }
                    }
                    Some('\n') | None => {
                        return Err(CompilerError::new(line, LexerError::UnterminatedString))
                    }
                    Some(_) => (),
                }
            }
            let mut s = branch.merge();
            s.remove(0);
            s.pop();

            Ok(Some(Token::new(line, StringLiteral(s))))
        } else {
            Ok(None)
        }
    }

    fn consume_identifier(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        if branch
            .peek()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        {
            while branch
                .peek()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
            {
                branch.next();
            }
        }

        let id = branch.merge();
        if id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Token::new(line, Identifier(id))))
        }
    }

    fn consume_operator(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        let mut operators = vec![
            ("&&", BAnd),
            ("||", BOr),
            ("!=", NEq),
            ("==", Eq),
            (">=", GrEq),
            ("<=", LsEq),
            ("(", LParen),
            (")", RParen),
            ("{", LBrace),
            ("}", RBrace),
            ("[", LBracket),
            ("]", RBracket),
            ("*", Mul),
            ("/", Div),
            ("%", Mod),
            ("+", Add),
            ("-", Minus),
            ("!", Not),
            ("&", Ampersand),
            ("=", Assign),
            (";", Semicolon),
            (",", Comma),
            (">", Gr),
            ("<", Ls),
        ];
        operators.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        for (op, t) in operators.into_iter() {
            if branch.next_ifn(op) {
                branch.merge();
                return Ok(Some(Token::new(line, t)));
            }
        }

        Ok(None)
    }

    fn if_keyword_map(&self, token: Token) -> Token {
        let keyword = match &token.s {
            Identifier(id) => match id.as_str() {
                "int" => Some(Int),
                "void" => Some(Void),
                "if" => Some(If),
                "else" => Some(Else),
                "while" => Some(While),
                "return" => Some(Return),
                "printf" => Some(Printf),
                "scanf" => Some(Scanf),
                _ => None,
            },
            _ => None,
        };

        match keyword {
            Some(k) => Token::new(token.l, k),
            None => token,
        }
    }
}
