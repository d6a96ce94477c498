//! Formula parser
//!
//! Two stages: [`parse`] splits a `Name = Expression` definition and applies
//! the `=` policy, [`parse_expression`] is a recursive descent parser for the
//! expression text with the precedence below.

use crate::ast::{self, BinaryOperator, Expression, UnaryOperator};
use crate::error::{ExpressionError, ExpressionResult, ParseError, ParseResult};
use crate::functions::{registry, FunctionDef, FunctionKind};
use log::debug;

/// A parsed-but-not-yet-evaluated derived column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaDefinition {
    /// Name of the column to create (trimmed left-hand side)
    pub name: String,
    /// Expression text (trimmed right-hand side)
    pub expression_text: String,
}

impl FormulaDefinition {
    /// Parse the expression text into an [`Expression`] tree
    pub fn expression(&self) -> ExpressionResult<Expression> {
        parse_expression(&self.expression_text)
    }
}

/// Parse a `Name = Expression` definition
///
/// Exactly one `=` is accepted. Zero is [`ParseError::NoEqualsFound`], more
/// than one is [`ParseError::Nonsense`].
///
/// # Example
/// ```rust
/// use tabcalc_formula::{parse, ParseError};
///
/// let def = parse(" Total Cells = Cell Density × Volume ").unwrap();
/// assert_eq!(def.name, "Total Cells");
/// assert_eq!(def.expression_text, "Cell Density × Volume");
///
/// assert_eq!(parse("X = A = B"), Err(ParseError::Nonsense));
/// assert_eq!(parse("NoEqualsHere"), Err(ParseError::NoEqualsFound));
/// ```
pub fn parse(input: &str) -> ParseResult<FormulaDefinition> {
    let Some((name, rest)) = input.split_once('=') else {
        return Err(ParseError::NoEqualsFound);
    };

    if rest.contains('=') {
        return Err(ParseError::Nonsense);
    }

    let definition = FormulaDefinition {
        name: name.trim().to_string(),
        expression_text: rest.trim().to_string(),
    };
    debug!(
        "Parsed definition '{}' = '{}'",
        definition.name, definition.expression_text
    );
    Ok(definition)
}

/// Parse expression text into an [`Expression`] tree
///
/// # Example
/// ```rust
/// use tabcalc_formula::{parse_expression, Expression};
///
/// let expr = parse_expression("if(Density > 5, (Density - lag(Density)) / Δt, null)").unwrap();
/// assert!(matches!(expr, Expression::Conditional { .. }));
/// ```
pub fn parse_expression(text: &str) -> ExpressionResult<Expression> {
    let mut parser = ExpressionParser::new(text)?;
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(parser.syntax_error(format!(
            "Unexpected {} after expression",
            parser.current_token().describe()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    String(String),

    // Column names, function names and keywords; whitespace-separated
    // words are joined into one token
    Word(String),
    // `[any text]`, always a column name
    Bracketed(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    GreaterThan,
    LessThan,
    NotEqual,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string \"{}\"", s),
            Token::Word(w) => format!("'{}'", w),
            Token::Bracketed(w) => format!("'[{}]'", w),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::GreaterThan => "'>'".into(),
            Token::LessThan => "'<'".into(),
            Token::NotEqual => "'<>'".into(),
            Token::Comma => "','".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of expression".into(),
        }
    }
}

/// Deepest nesting of parentheses, calls and prefix operators accepted
pub const MAX_NESTING_DEPTH: usize = 128;

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Expression parser
struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    current_token: Option<Token>,
    depth: usize,
}

impl<'a> ExpressionParser<'a> {
    fn new(input: &'a str) -> ExpressionResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: None,
            depth: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> ExpressionResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = Some(self.scan_token()?);
        Ok(())
    }

    fn scan_token(&mut self) -> ExpressionResult<Token> {
        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' | '×' => Some(Token::Star),
            '/' | '÷' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '>' => Some(Token::GreaterThan),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c == '<' {
            self.advance();
            if self.peek_char() == Some('>') {
                self.advance();
                return Ok(Token::NotEqual);
            }
            return Ok(Token::LessThan);
        }

        if c == '"' {
            return self.scan_string();
        }

        if c == '[' {
            return self.scan_bracketed();
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if is_word_start(c) {
            return Ok(self.scan_words());
        }

        Err(self.syntax_error(format!("Unexpected character '{}'", c)))
    }

    fn scan_string(&mut self) -> ExpressionResult<Token> {
        self.advance(); // Skip opening quote

        let mut s = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    // Check for escaped quote ("")
                    if self.peek_char_at(1) == Some('"') {
                        s.push('"');
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(Token::String(s));
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => return Err(self.syntax_error("Unterminated string literal")),
            }
        }
    }

    fn scan_bracketed(&mut self) -> ExpressionResult<Token> {
        self.advance(); // Skip '['

        let start = self.pos;
        while self.peek_char().map_or(false, |c| c != ']') {
            self.advance();
        }
        if self.is_at_end() {
            return Err(self.syntax_error("Unterminated column name, expected ']'"));
        }

        let name = self.input[start..self.pos].trim().to_string();
        self.advance(); // Skip ']'

        if name.is_empty() {
            return Err(self.syntax_error("Empty column name"));
        }
        Ok(Token::Bracketed(name))
    }

    fn scan_number(&mut self) -> ExpressionResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part, only when digits follow
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let sign = self.peek_char_at(1).map_or(false, |c| c == '+' || c == '-');
            let digit_at = if sign { 2 } else { 1 };
            if self
                .peek_char_at(digit_at)
                .map_or(false, |c| c.is_ascii_digit())
            {
                for _ in 0..digit_at {
                    self.advance();
                }
                while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse()
            .map(Token::Number)
            .map_err(|_| self.syntax_error(format!("Invalid number '{}'", num_str)))
    }

    fn scan_words(&mut self) -> Token {
        let mut words = vec![self.scan_word()];

        // "Cell Density" is one column name
        loop {
            let save = self.pos;
            self.skip_whitespace();
            if self.pos > save && self.peek_char().map_or(false, is_word_start) {
                words.push(self.scan_word());
            } else {
                self.pos = save;
                break;
            }
        }

        Token::Word(words.join(" "))
    }

    fn scan_word(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek_char().map_or(false, is_word_char) {
            self.advance();
        }
        &input[start..self.pos]
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn syntax_error<S: Into<String>>(&self, message: S) -> ExpressionError {
        ExpressionError::Syntax {
            offset: self.token_start,
            message: message.into(),
        }
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> ExpressionResult<Token> {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> ExpressionResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(self.syntax_error(format!(
                "Expected {}, got {}",
                expected.describe(),
                self.current_token().describe()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Comparison: >, <, <>
    // 2. Addition/Subtraction: +, -
    // 3. Multiplication/Division: *, ×, /, ÷
    // 4. Exponentiation: ^ (right associative)
    // 5. Unary: -, +
    // 6. Primary: literals, keywords, columns, function calls, parentheses

    fn parse_expression(&mut self) -> ExpressionResult<Expression> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ExpressionResult<Expression> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.current_token() {
                Token::GreaterThan => BinaryOperator::GreaterThan,
                Token::LessThan => BinaryOperator::LessThan,
                Token::NotEqual => BinaryOperator::NotEqual,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_additive()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> ExpressionResult<Expression> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ExpressionResult<Expression> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_exponent()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_exponent(&mut self) -> ExpressionResult<Expression> {
        let left = self.parse_unary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume()?;
            let right = self.parse_exponent()?; // Right associative
            return Ok(Expression::binary(BinaryOperator::Power, left, right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ExpressionResult<Expression> {
        // Every nested subexpression passes through here
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.syntax_error(format!(
                "Expression nested deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        let result = self.parse_prefixed();
        self.depth -= 1;
        result
    }

    fn parse_prefixed(&mut self) -> ExpressionResult<Expression> {
        // Prefix unary minus
        if matches!(self.current_token(), Token::Minus) {
            self.consume()?;
            let operand = self.parse_unary()?;
            return Ok(Expression::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.consume()?;
            return self.parse_unary();
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ExpressionResult<Expression> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expression::Number(n))
            }

            Token::String(s) => {
                self.consume()?;
                Ok(Expression::String(s))
            }

            Token::LeftParen => {
                self.consume()?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::Bracketed(name) => {
                self.consume()?;
                Ok(Expression::ColumnRef(name))
            }

            Token::Word(word) => {
                let offset = self.token_start;
                self.consume()?;
                // Check if it's a function call
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(word)
                } else if let Some(expr) = ast::keyword(&word) {
                    Ok(expr)
                } else if let Some(reserved) = reserved_word(&word) {
                    // `sum Volume`, `Volume dt`: a built-in is never part of a bare name
                    Err(ExpressionError::Syntax {
                        offset,
                        message: format!(
                            "'{}' cannot be part of column name '{}', write [{}] to mean the column",
                            reserved, word, word
                        ),
                    })
                } else {
                    Ok(Expression::ColumnRef(word))
                }
            }

            other => Err(self.syntax_error(format!("Unexpected {}", other.describe()))),
        }
    }

    fn parse_function_call(&mut self, name: String) -> ExpressionResult<Expression> {
        let def = registry()
            .get(&name)
            .ok_or(ExpressionError::UnknownFunction(name))?;

        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        // Parse arguments
        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume()?;
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;

        if args.len() < def.min_args || args.len() > def.max_args {
            return Err(ExpressionError::ArgumentCount {
                function: def.name.to_string(),
                expected: def.arity(),
                actual: args.len(),
            });
        }

        match def.kind {
            FunctionKind::Conditional => {
                let mut args = args.into_iter();
                let mut next = || args.next().map(Box::new);
                match (next(), next(), next()) {
                    (Some(condition), Some(then_branch), else_branch) => {
                        Ok(Expression::Conditional {
                            condition,
                            then_branch,
                            else_branch: else_branch.unwrap_or_else(|| Box::new(Expression::Null)),
                        })
                    }
                    _ => Err(ExpressionError::ArgumentCount {
                        function: def.name.to_string(),
                        expected: def.arity(),
                        actual: 0,
                    }),
                }
            }
            FunctionKind::Aggregate(kind) => Ok(Expression::Aggregate {
                kind,
                column: column_argument(def, args)?,
            }),
            FunctionKind::Sequence(kind) => Ok(Expression::Sequence {
                kind,
                column: column_argument(def, args)?,
            }),
            FunctionKind::ValueDelta => Ok(Expression::ValueDelta {
                column: column_argument(def, args)?,
            }),
        }
    }
}

/// A built-in function name or keyword inside a multi-word name
fn reserved_word(name: &str) -> Option<&str> {
    if !name.contains(' ') {
        return None;
    }
    name.split(' ')
        .find(|word| registry().get(word).is_some() || ast::keyword(word).is_some())
}

/// The single argument of a column function, which must be a column reference
fn column_argument(def: &FunctionDef, args: Vec<Expression>) -> ExpressionResult<String> {
    match args.into_iter().next() {
        Some(Expression::ColumnRef(name)) => Ok(name),
        Some(other) => Err(ExpressionError::ExpectedColumn {
            function: def.name.to_string(),
            found: other.describe().to_string(),
        }),
        None => Err(ExpressionError::ArgumentCount {
            function: def.name.to_string(),
            expected: def.arity(),
            actual: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AggregateKind, SequenceKind};
    use pretty_assertions::assert_eq;

    fn col(name: &str) -> Expression {
        Expression::column(name)
    }

    #[test]
    fn test_parse_definition() {
        let def = parse("Total Cells = Cell Density × Volume").unwrap();
        assert_eq!(def.name, "Total Cells");
        assert_eq!(def.expression_text, "Cell Density × Volume");

        let def = parse("  Rate=  Δt ").unwrap();
        assert_eq!(def.name, "Rate");
        assert_eq!(def.expression_text, "Δt");
    }

    #[test]
    fn test_parse_definition_equals_policy() {
        assert_eq!(parse("NoEqualsHere"), Err(ParseError::NoEqualsFound));
        assert_eq!(parse(""), Err(ParseError::NoEqualsFound));
        assert_eq!(parse("X = A = B"), Err(ParseError::Nonsense));
        assert_eq!(parse("X = A >= B"), Err(ParseError::Nonsense));
        assert_eq!(parse("X == A"), Err(ParseError::Nonsense));
    }

    #[test]
    fn test_parse_empty_sides() {
        let def = parse("=").unwrap();
        assert_eq!(def.name, "");
        assert_eq!(def.expression_text, "");
        assert!(def.expression().is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42").unwrap(), Expression::Number(42.0));
        assert_eq!(parse_expression("3.25").unwrap(), Expression::Number(3.25));
        assert_eq!(parse_expression(".5").unwrap(), Expression::Number(0.5));
        assert_eq!(parse_expression("1e3").unwrap(), Expression::Number(1000.0));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse_expression("\"say \"\"hi\"\"\"").unwrap(),
            Expression::String("say \"hi\"".into())
        );
        assert!(matches!(
            parse_expression("\"open"),
            Err(ExpressionError::Syntax { .. })
        ));
    }

    #[test]
    fn test_parse_multi_word_columns() {
        assert_eq!(
            parse_expression("Cell Density × Volume").unwrap(),
            Expression::binary(BinaryOperator::Multiply, col("Cell Density"), col("Volume"))
        );
        // Runs of whitespace collapse to one space
        assert_eq!(parse_expression("Cell    Density").unwrap(), col("Cell Density"));
        assert_eq!(
            parse_expression("[Volume (mL)] ÷ 1000").unwrap(),
            Expression::binary(
                BinaryOperator::Divide,
                col("Volume (mL)"),
                Expression::Number(1000.0)
            )
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_expression("null").unwrap(), Expression::Null);
        assert_eq!(parse_expression("NULL").unwrap(), Expression::Null);
        assert_eq!(parse_expression("Δt").unwrap(), Expression::TimeDelta);
        assert_eq!(parse_expression("dt").unwrap(), Expression::TimeDelta);
        assert_eq!(parse_expression("[dt]").unwrap(), col("dt"));
    }

    #[test]
    fn test_parse_precedence() {
        // 1 + (2 * 3)
        assert_eq!(
            parse_expression("1 + 2 * 3").unwrap(),
            Expression::binary(
                BinaryOperator::Add,
                Expression::Number(1.0),
                Expression::binary(
                    BinaryOperator::Multiply,
                    Expression::Number(2.0),
                    Expression::Number(3.0)
                )
            )
        );

        // Comparison binds loosest
        let expr = parse_expression("a + 1 > b").unwrap();
        assert!(matches!(
            expr,
            Expression::BinaryOp {
                op: BinaryOperator::GreaterThan,
                ..
            }
        ));

        // Power is right associative
        assert_eq!(
            parse_expression("2 ^ 3 ^ 2").unwrap().to_string(),
            "(2 ^ (3 ^ 2))"
        );

        // Subtraction is left associative
        assert_eq!(
            parse_expression("a - b - c").unwrap().to_string(),
            "((a - b) - c)"
        );
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(
            parse_expression("-x").unwrap(),
            Expression::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(col("x")),
            }
        );
        assert_eq!(parse_expression("+x").unwrap(), col("x"));
    }

    #[test]
    fn test_parse_builtins() {
        assert_eq!(
            parse_expression("sum(Volume)").unwrap(),
            Expression::Aggregate {
                kind: AggregateKind::Sum,
                column: "Volume".into()
            }
        );
        assert_eq!(
            parse_expression("LEAD(Cell Density)").unwrap(),
            Expression::Sequence {
                kind: SequenceKind::Lead,
                column: "Cell Density".into()
            }
        );
        assert_eq!(
            parse_expression("delta(OD)").unwrap(),
            Expression::ValueDelta {
                column: "OD".into()
            }
        );
        for spelling in ["Δv(OD)", "dv(OD)", "DV(OD)"] {
            assert_eq!(
                parse_expression(spelling).unwrap(),
                Expression::ValueDelta {
                    column: "OD".into()
                }
            );
        }
        assert_eq!(
            parse_expression("if(x > 1, x)").unwrap(),
            Expression::Conditional {
                condition: Box::new(Expression::binary(
                    BinaryOperator::GreaterThan,
                    col("x"),
                    Expression::Number(1.0)
                )),
                then_branch: Box::new(col("x")),
                else_branch: Box::new(Expression::Null),
            }
        );
    }

    #[test]
    fn test_parse_density_rate_formula() {
        let expr = parse_expression("if(Density > 5, (Density - lag(Density)) / Δt, null)").unwrap();
        assert_eq!(
            expr.to_string(),
            "if((Density > 5), ((Density - lag(Density)) / Δt), null)"
        );
    }

    #[test]
    fn test_builtin_names_inside_column_names() {
        for text in ["sum Volume", "average Volume", "Volume dt", "Cell null Density"] {
            assert!(
                matches!(parse_expression(text), Err(ExpressionError::Syntax { offset: 0, .. })),
                "{} should not parse",
                text
            );
        }
        assert!(matches!(
            parse_expression("2 * Max Volume"),
            Err(ExpressionError::Syntax { offset: 4, .. })
        ));
        // Brackets and single words still name columns
        assert_eq!(parse_expression("[sum Volume]").unwrap(), col("sum Volume"));
        assert_eq!(parse_expression("count").unwrap(), col("count"));
        assert_eq!(parse_expression("[Cell Count]").unwrap(), col("Cell Count"));
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            parse_expression(&nested(MAX_NESTING_DEPTH - 1)).unwrap(),
            Expression::Number(1.0)
        );
        assert!(matches!(
            parse_expression(&nested(3000)),
            Err(ExpressionError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression(&"-".repeat(3000)),
            Err(ExpressionError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression(&format!("{}x", "lag(".repeat(3000))),
            Err(ExpressionError::Syntax { .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_expression("stdev(x)"),
            Err(ExpressionError::UnknownFunction("stdev".into()))
        );
        assert!(matches!(
            parse_expression("sum(a, b)"),
            Err(ExpressionError::ArgumentCount { actual: 2, .. })
        ));
        assert!(matches!(
            parse_expression("lag(x + 1)"),
            Err(ExpressionError::ExpectedColumn { .. })
        ));
        assert!(matches!(
            parse_expression("a b (c"),
            Err(ExpressionError::UnknownFunction(_))
        ));
        assert!(matches!(
            parse_expression("(a + b"),
            Err(ExpressionError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression("a $ b"),
            Err(ExpressionError::Syntax { offset: 2, .. })
        ));
        assert!(matches!(
            parse_expression("a 5"),
            Err(ExpressionError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression(""),
            Err(ExpressionError::Syntax { .. })
        ));
    }
}
