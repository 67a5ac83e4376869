use std::fmt;

/// Lexical token produced by the [`Lexer`](crate::lexer::Lexer).
///
/// Numeric tokens carry their lexeme unchanged; the parser converts them.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Identifier used for group names, keys and expression names
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// camera
    /// max_depth
    /// _internal
    /// ```
    Identifier(String),

    /// String literal delimited by `"` or `'`, with escapes already decoded
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it\'s'
    /// "été"
    /// ```
    String(String),

    /// Integer literal with optional sign
    ///
    /// # Examples
    /// ```text
    /// 42
    /// +1
    /// -10
    /// ```
    Integer(String),

    /// Floating-point literal, recognised by a fractional dot or an exponent
    ///
    /// # Examples
    /// ```text
    /// 1.0
    /// .5
    /// -1e-5
    /// ```
    Float(String),

    /// `true`
    True,

    /// `false`
    False,

    /// A number-like lexeme that is neither an integer nor a float, e.g. a lone `-`
    /// or `1e`. The lexer has already logged an error for it.
    Invalid(String),

    // Delimiters
    /// `(`
    OpenParen,

    /// `)`
    CloseParen,

    /// `[`
    OpenBracket,

    /// `]`
    CloseBracket,

    /// `,`
    Comma,

    /// `:` introducing a key
    Colon,

    /// `$(` opening an inline expression
    ///
    /// # Examples
    /// ```text
    /// $(if true 1 2)
    /// ```
    ExpressionOpen,

    /// End of input
    Eof,
}

/// Payload-free classification of a [`Token`], used for matching and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    String,
    Integer,
    Float,
    True,
    False,
    Invalid,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    ExpressionOpen,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Identifier(_) => TokenKind::Identifier,
            Token::String(_) => TokenKind::String,
            Token::Integer(_) => TokenKind::Integer,
            Token::Float(_) => TokenKind::Float,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Invalid(_) => TokenKind::Invalid,
            Token::OpenParen => TokenKind::OpenParen,
            Token::CloseParen => TokenKind::CloseParen,
            Token::OpenBracket => TokenKind::OpenBracket,
            Token::CloseBracket => TokenKind::CloseBracket,
            Token::Comma => TokenKind::Comma,
            Token::Colon => TokenKind::Colon,
            Token::ExpressionOpen => TokenKind::ExpressionOpen,
            Token::Eof => TokenKind::Eof,
        }
    }

    /// The text payload of identifier, string and numeric tokens.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Identifier(s)
            | Token::String(s)
            | Token::Integer(s)
            | Token::Float(s)
            | Token::Invalid(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the token, returning its text payload or an empty string.
    pub fn into_text(self) -> String {
        match self {
            Token::Identifier(s)
            | Token::String(s)
            | Token::Integer(s)
            | Token::Float(s)
            | Token::Invalid(s) => s,
            _ => String::new(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Invalid => "INVALID",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::ExpressionOpen => "$(",
            TokenKind::Eof => "EOF",
        };
        f.write_str(s)
    }
}
