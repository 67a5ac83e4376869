use crate::ast::Token;
use crate::logger::{Level, SourceLogger};

/// 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

/// Converts source text into [`Token`]s, one at a time.
///
/// Lexical errors never stop the lexer: they are logged with their position,
/// the offending input is skipped and scanning resumes. Every error consumes
/// input, so the lexer always reaches [`Token::Eof`].
pub struct Lexer<'a> {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    logger: &'a dyn SourceLogger,
    /// Token buffered by `look()` with the position just after it.
    peeked: Option<(Token, Position)>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &str, logger: &'a dyn SourceLogger) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            logger,
            peeked: None,
        }
    }

    pub fn logger(&self) -> &'a dyn SourceLogger {
        self.logger
    }

    /// Current line and column.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Returns the next token and advances past it.
    pub fn next_token(&mut self) -> Token {
        if let Some((token, after)) = self.peeked.take() {
            self.line = after.line;
            self.column = after.column;
            return token;
        }
        self.scan()
    }

    /// Returns the next token without consuming it.
    ///
    /// Repeated calls without an intervening [`next_token`](Self::next_token)
    /// return the same token and leave the reported position unchanged.
    pub fn look(&mut self) -> Token {
        if let Some((token, _)) = &self.peeked {
            return token.clone();
        }

        let before = self.position();
        let token = self.scan();
        self.peeked = Some((token.clone(), self.position()));
        self.line = before.line;
        self.column = before.column;
        token
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn error(&self, message: &str) {
        self.logger.log_at(self.line, self.column, Level::Error, message);
    }

    fn is_whitespace(ch: char) -> bool {
        matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C')
    }

    fn scan(&mut self) -> Token {
        loop {
            let Some(ch) = self.current_char() else {
                return Token::Eof;
            };

            match ch {
                c if Self::is_whitespace(c) => self.advance(),
                ';' => self.skip_comment(),
                '$' => {
                    self.advance();
                    match self.current_char() {
                        Some('(') => {
                            self.advance();
                            return Token::ExpressionOpen;
                        }
                        None => {
                            self.error("No '(' after '$'");
                            return Token::Eof;
                        }
                        Some(c) => self.error(&format!("Invalid character '{c}' after '$'")),
                    }
                }
                '(' => return self.single(Token::OpenParen),
                ')' => return self.single(Token::CloseParen),
                '[' => return self.single(Token::OpenBracket),
                ']' => return self.single(Token::CloseBracket),
                ',' => return self.single(Token::Comma),
                ':' => return self.single(Token::Colon),
                '"' | '\'' => return Token::String(self.read_string(ch)),
                c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                    return self.read_number();
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let ident = self.read_identifier();
                    return match ident.as_str() {
                        "true" => Token::True,
                        "false" => Token::False,
                        _ => Token::Identifier(ident),
                    };
                }
                c => {
                    self.error(&format!("Invalid character '{c}'"));
                    self.advance();
                }
            }
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> String {
        let mut result = String::new();
        self.advance(); // opening quote

        loop {
            match self.current_char() {
                None | Some('\n') => {
                    self.error(&format!("The string \"{result}\" is not closed"));
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.read_escape(&mut result);
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        result
    }

    /// Decodes the escape after a backslash into `out`.
    fn read_escape(&mut self, out: &mut String) {
        let Some(ch) = self.current_char() else {
            self.error("Invalid use of the '\\' operator");
            return;
        };

        let simple = match ch {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            'f' => Some('\x0C'),
            'v' => Some('\x0B'),
            _ => None,
        };

        match ch {
            // Line continuation
            '\n' => self.advance(),
            'x' | 'u' | 'U' => {
                self.advance();
                let length = match ch {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                self.read_code_point(length, out);
            }
            _ => {
                out.push(simple.unwrap_or(ch));
                self.advance();
            }
        }
    }

    fn read_code_point(&mut self, length: usize, out: &mut String) {
        let mut digits = String::with_capacity(length);
        while digits.len() < length {
            match self.current_char() {
                None | Some('\n') => {
                    self.error("Invalid use of Unicode escape sequence");
                    return;
                }
                Some(c) => {
                    digits.push(c);
                    self.advance();
                }
            }
        }

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            self.error(&format!("Given escape sequence '{digits}' is invalid"));
            return;
        }

        let decoded = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32);
        match decoded {
            Some(c) => out.push(c),
            None => self.error(&format!("Invalid Unicode range '{digits}'")),
        }
    }

    /// Scans sign, integer digits, an optional fraction and an optional exponent.
    fn read_number(&mut self) -> Token {
        let mut lexeme = String::new();

        let mut has_data = false;
        let mut has_dot = false;
        let mut has_exp = false;
        let mut has_exp_data = false;

        let start = self.position();
        let Some(first) = self.current_char() else {
            return Token::Eof;
        };
        match first {
            '.' => has_dot = true,
            '+' | '-' => {}
            _ => has_data = true,
        }
        lexeme.push(first);
        self.advance();

        if !has_dot {
            has_data |= self.read_digits(&mut lexeme);

            if self.current_char() == Some('.') {
                has_dot = true;
                lexeme.push('.');
                self.advance();
            }
        }

        has_data |= self.read_digits(&mut lexeme);

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            has_exp = true;
            lexeme.push(e);
            self.advance();

            if let Some(sign @ ('+' | '-')) = self.current_char() {
                lexeme.push(sign);
                self.advance();
            }

            has_exp_data = self.read_digits(&mut lexeme);
        }

        if has_data && (has_dot || (has_exp && has_exp_data)) {
            Token::Float(lexeme)
        } else if has_data && !has_exp {
            Token::Integer(lexeme)
        } else {
            self.logger.log_at(
                start.line,
                start.column,
                Level::Error,
                &format!("Malformed number '{lexeme}'"),
            );
            Token::Invalid(lexeme)
        }
    }

    fn read_digits(&mut self, lexeme: &mut String) -> bool {
        let mut any = false;
        while let Some(ch) = self.current_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            lexeme.push(ch);
            self.advance();
            any = true;
        }
        any
    }
}
