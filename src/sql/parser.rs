use sqlparser::{
    ast::{Expr, Statement},
    dialect::GenericDialect,
    parser::{Parser, ParserError},
    tokenizer::{Token, Tokenizer},
};

/// SQL Parser
pub struct SQLParser;

impl SQLParser {
    pub fn parse(sql: &str) -> Result<Statement, ParserError> {
        let dialect = GenericDialect {};
        let mut tokenizer = Tokenizer::new(&dialect, sql);
        let tokens = tokenizer.tokenize()?;
        let mut parser = Parser::new(tokens, &dialect);
        parser.parse_statement()
    }

    /// Parses a bare scalar expression such as `+CAST('1.5' AS CHAR(12))`.
    pub fn parse_expr(sql: &str) -> Result<Expr, ParserError> {
        let dialect = GenericDialect {};
        let mut tokenizer = Tokenizer::new(&dialect, sql);
        let tokens = tokenizer.tokenize()?;
        let mut parser = Parser::new(tokens, &dialect);
        let expr = parser.parse_expr()?;
        match parser.peek_token() {
            Token::EOF => Ok(expr),
            token => Err(ParserError::ParserError(format!(
                "unexpected token {} after expression",
                token
            ))),
        }
    }

    /// Whether `sql` should be parsed as a statement rather than a bare
    /// expression.
    pub fn is_statement(sql: &str) -> bool {
        sql.trim_start()
            .split_whitespace()
            .next()
            .map_or(false, |word| word.eq_ignore_ascii_case("select"))
    }
}
