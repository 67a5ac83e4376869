use crate::{
    ast::{DataNode, ExpressionNode, StatementNode, SyntaxTree, Token, TokenKind, ValueNode},
    lexer::Lexer,
    logger::{Level, SourceLogger},
};

/// Deepest nesting of groups, arrays and expressions the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser producing a [`SyntaxTree`].
///
/// A token mismatch is logged and parsing carries on as if the expected token
/// had been present, so malformed input still yields a partial tree. Values
/// nested deeper than [`MAX_DEPTH`] are reported and dropped.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    logger: &'a dyn SourceLogger,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let logger = lexer.logger();
        Parser {
            lexer,
            logger,
            depth: 0,
        }
    }

    /// Parses the whole token stream.
    pub fn parse(&mut self) -> SyntaxTree {
        let mut tree = SyntaxTree::default();

        while self.lookahead(TokenKind::OpenParen) {
            self.expect(TokenKind::OpenParen);
            tree.statements.push(self.parse_statement());
            self.expect(TokenKind::CloseParen);
        }

        if !self.lookahead(TokenKind::Eof) {
            let kind = self.lexer.look().kind();
            self.error(&format!("Expected '(' or end of input but got '{kind}'"));
        }

        tracing::debug!(statements = tree.len(), "parsed source unit");
        tree
    }

    /// Consumes one token, logging an error when it is not of the `expected` kind.
    ///
    /// The consumed token is returned either way.
    fn expect(&mut self, expected: TokenKind) -> Token {
        let token = self.lexer.next_token();
        if token.kind() != expected {
            self.error(&format!("Expected '{expected}' but got '{}'", token.kind()));
        }
        token
    }

    fn lookahead(&mut self, kind: TokenKind) -> bool {
        self.lexer.look().kind() == kind
    }

    fn error(&self, message: &str) {
        let pos = self.lexer.position();
        self.logger.log_at(pos.line, pos.column, Level::Error, message);
    }

    fn identifier(&mut self) -> String {
        match self.expect(TokenKind::Identifier) {
            Token::Identifier(name) => name,
            _ => String::new(),
        }
    }

    fn parse_statement(&mut self) -> StatementNode {
        let mut node = StatementNode::new(self.identifier());

        if self.lookahead(TokenKind::Comma) {
            self.expect(TokenKind::Comma);
        }

        node.data = self.parse_data_list();
        node
    }

    fn parse_expression(&mut self) -> ExpressionNode {
        let mut node = ExpressionNode::new(self.identifier());
        node.args = self.parse_data_list();
        node
    }

    fn starts_data(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Colon
                | TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::ExpressionOpen
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Invalid
        )
    }

    fn parse_data_list(&mut self) -> Vec<DataNode> {
        let mut list = vec![];

        while Self::starts_data(self.lexer.look().kind()) {
            if let Some(data) = self.parse_data() {
                list.push(data);
            }

            if self.lookahead(TokenKind::Comma) {
                self.expect(TokenKind::Comma);
            }
        }

        list
    }

    /// Parses `[':' key] value`. Returns `None` when the value was dropped.
    fn parse_data(&mut self) -> Option<DataNode> {
        let mut key = String::new();

        if self.lookahead(TokenKind::Colon) {
            self.expect(TokenKind::Colon);

            key = if self.lookahead(TokenKind::Integer) {
                self.expect(TokenKind::Integer).into_text()
            } else {
                self.identifier()
            };
        }

        let value = self.parse_value()?;
        Some(DataNode::new(key, value))
    }

    /// Consumes a nested value opened by the current token, up to and
    /// including its matching closer.
    fn skip_nested(&mut self) {
        let mut open = 0usize;
        loop {
            match self.lexer.next_token() {
                Token::OpenParen | Token::OpenBracket | Token::ExpressionOpen => open += 1,
                Token::CloseParen | Token::CloseBracket => {
                    open = open.saturating_sub(1);
                    if open == 0 {
                        return;
                    }
                }
                Token::Eof => return,
                _ => {}
            }
        }
    }

    fn parse_value(&mut self) -> Option<ValueNode> {
        let token = self.lexer.look();
        let nested = matches!(
            token,
            Token::OpenParen | Token::OpenBracket | Token::ExpressionOpen
        );
        if nested && self.depth >= MAX_DEPTH {
            self.error(&format!("Nesting is deeper than {MAX_DEPTH} levels"));
            self.skip_nested();
            return None;
        }

        match token {
            Token::OpenParen => {
                self.depth += 1;
                self.expect(TokenKind::OpenParen);
                let statement = self.parse_statement();
                self.expect(TokenKind::CloseParen);
                self.depth -= 1;
                Some(ValueNode::Statement(statement))
            }
            Token::OpenBracket => {
                self.depth += 1;
                self.expect(TokenKind::OpenBracket);
                let array = StatementNode {
                    name: String::new(),
                    data: self.parse_data_list(),
                };
                self.expect(TokenKind::CloseBracket);
                self.depth -= 1;
                Some(ValueNode::Statement(array))
            }
            Token::ExpressionOpen => {
                self.depth += 1;
                self.expect(TokenKind::ExpressionOpen);
                let expression = self.parse_expression();
                self.expect(TokenKind::CloseParen);
                self.depth -= 1;
                Some(ValueNode::Expression(expression))
            }
            Token::Integer(text) => {
                self.lexer.next_token();
                match text.parse::<i64>() {
                    Ok(n) => Some(ValueNode::Integer(n)),
                    Err(_) => {
                        self.error(&format!("Integer '{text}' is out of range"));
                        None
                    }
                }
            }
            Token::Float(text) => {
                self.lexer.next_token();
                match parse_float(&text) {
                    Some(n) => Some(ValueNode::Float(n)),
                    None => {
                        self.error(&format!("Invalid float '{text}'"));
                        None
                    }
                }
            }
            Token::String(s) => {
                self.lexer.next_token();
                Some(ValueNode::String(s))
            }
            Token::True => {
                self.lexer.next_token();
                Some(ValueNode::Boolean(true))
            }
            Token::False => {
                self.lexer.next_token();
                Some(ValueNode::Boolean(false))
            }
            // Already reported by the lexer.
            Token::Invalid(_) => {
                self.lexer.next_token();
                None
            }
            token => {
                let pos = self.lexer.position();
                self.logger.log_at(
                    pos.line,
                    pos.column,
                    Level::Fatal,
                    &format!("Unknown lookahead '{}' for values", token.kind()),
                );
                None
            }
        }
    }
}

/// Parses a float lexeme, ignoring an exponent marker that has no digits (`1.5e`).
fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .or_else(|| text.trim_end_matches(['e', 'E', '+', '-']).parse::<f64>().ok())
}
