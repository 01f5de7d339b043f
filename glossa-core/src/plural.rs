//! Plural Expression Engine
//!
//! Compiles the `plural=` expression of a catalog's `Plural-Forms` header
//! into an AST and evaluates it against a cardinal number to pick a plural
//! form index.
//!
//! The language is the C subset used by gettext: integer literals, the
//! variable `n`, `+ - * / %`, comparisons, `&& || !`, `?:` and parentheses.
//! All values are `u64` with wrapping arithmetic; comparisons and logical
//! operators yield `0` or `1`.
//!
//! ```
//! use glossa_core::PluralExpr;
//!
//! let expr = PluralExpr::compile("n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2").unwrap();
//! assert_eq!(expr.eval(21), Ok(0));
//! assert_eq!(expr.eval(11), Ok(1));
//! assert_eq!(expr.eval(0), Ok(2));
//! ```

use crate::{EvalError, IntlError, Result};
use std::fmt;
use std::sync::Arc;

/// Default bound on nested operator levels during evaluation.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Parenthesis / `!` / ternary nesting accepted by the parser.
const MAX_NESTING: usize = 128;

/// Tallest tree the compiler will build, and so the largest useful
/// evaluation depth.
pub const MAX_TREE_HEIGHT: u32 = 256;

// ============================================================================
// AST
// ============================================================================

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
}

impl BinaryOp {
    /// Operator spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Ge => ">=",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Apply a non short-circuiting operator.
    fn apply(self, a: u64, b: u64) -> std::result::Result<u64, EvalError> {
        Ok(match self {
            BinaryOp::Eq => (a == b) as u64,
            BinaryOp::Ne => (a != b) as u64,
            BinaryOp::Ge => (a >= b) as u64,
            BinaryOp::Le => (a <= b) as u64,
            BinaryOp::Gt => (a > b) as u64,
            BinaryOp::Lt => (a < b) as u64,
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div => a.checked_div(b).ok_or(EvalError::DivisionByZero)?,
            BinaryOp::Rem => a.checked_rem(b).ok_or(EvalError::DivisionByZero)?,
            BinaryOp::And => (a != 0 && b != 0) as u64,
            BinaryOp::Or => (a != 0 || b != 0) as u64,
        })
    }
}

/// Compiled expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal
    Literal(u64),
    /// The variable `n`
    N,
    /// Logical negation
    Not(Box<Expr>),
    /// Binary operation
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `cond ? then : else`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate with `level` nested operator levels already entered.
    ///
    /// `&&`, `||` and `?:` evaluate only the operands they need, so a
    /// failing operand that is never reached does not fail the whole.
    pub fn eval_at(&self, n: u64, level: u32, max_level: u32) -> std::result::Result<u64, EvalError> {
        if level >= max_level {
            return Err(EvalError::DepthExceeded);
        }
        let next = level + 1;

        match self {
            Expr::Literal(v) => Ok(*v),
            Expr::N => Ok(n),
            Expr::Not(a) => Ok((a.eval_at(n, next, max_level)? == 0) as u64),
            Expr::Binary(BinaryOp::And, a, b) => {
                if a.eval_at(n, next, max_level)? == 0 {
                    return Ok(0);
                }
                Ok((b.eval_at(n, next, max_level)? != 0) as u64)
            }
            Expr::Binary(BinaryOp::Or, a, b) => {
                if a.eval_at(n, next, max_level)? != 0 {
                    return Ok(1);
                }
                Ok((b.eval_at(n, next, max_level)? != 0) as u64)
            }
            Expr::Binary(op, a, b) => {
                let a = a.eval_at(n, next, max_level)?;
                let b = b.eval_at(n, next, max_level)?;
                op.apply(a, b)
            }
            Expr::Ternary(cond, then, otherwise) => {
                if cond.eval_at(n, next, max_level)? != 0 {
                    then.eval_at(n, next, max_level)
                } else {
                    otherwise.eval_at(n, next, max_level)
                }
            }
        }
    }

    /// Height of the tree (a leaf has height 1).
    pub fn height(&self) -> usize {
        match self {
            Expr::Literal(_) | Expr::N => 1,
            Expr::Not(a) => 1 + a.height(),
            Expr::Binary(_, a, b) => 1 + a.height().max(b.height()),
            Expr::Ternary(a, b, c) => 1 + a.height().max(b.height()).max(c.height()),
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesized rendering, handy for checking how a rule parsed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::N => f.write_str("n"),
            Expr::Not(a) => write!(f, "!{}", a),
            Expr::Binary(op, a, b) => write!(f, "({} {} {})", a, op.as_str(), b),
            Expr::Ternary(a, b, c) => write!(f, "({} ? {} : {})", a, b, c),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number(u64),
    Var,
    Op(BinaryOp),
    Bang,
    Question,
    Colon,
    LParen,
    RParen,
    End,
}

fn syntax(position: usize, message: impl Into<String>) -> IntlError {
    IntlError::ExpressionSyntax {
        position,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let next = bytes.get(pos + 1).copied();

        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c' => {
                pos += 1;
                continue;
            }
            b'0'..=b'9' => {
                let mut value: u64 = 0;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(bytes[pos] - b'0')))
                        .ok_or_else(|| syntax(start, "integer literal overflows"))?;
                    pos += 1;
                }
                tokens.push((start, Token::Number(value)));
                continue;
            }
            b'n' => Token::Var,
            b'+' => Token::Op(BinaryOp::Add),
            b'-' => Token::Op(BinaryOp::Sub),
            b'*' => Token::Op(BinaryOp::Mul),
            b'/' => Token::Op(BinaryOp::Div),
            b'%' => Token::Op(BinaryOp::Rem),
            b'?' => Token::Question,
            b':' => Token::Colon,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'=' if next == Some(b'=') => Token::Op(BinaryOp::Eq),
            b'!' if next == Some(b'=') => Token::Op(BinaryOp::Ne),
            b'!' => Token::Bang,
            b'>' if next == Some(b'=') => Token::Op(BinaryOp::Ge),
            b'<' if next == Some(b'=') => Token::Op(BinaryOp::Le),
            b'>' => Token::Op(BinaryOp::Gt),
            b'<' => Token::Op(BinaryOp::Lt),
            b'&' if next == Some(b'&') => Token::Op(BinaryOp::And),
            b'|' if next == Some(b'|') => Token::Op(BinaryOp::Or),
            _ => {
                let ch = text[start..].chars().next().unwrap_or('?');
                return Err(syntax(start, format!("unexpected character '{}'", ch)));
            }
        };

        pos += match token {
            Token::Op(op) => op.as_str().len(),
            _ => 1,
        };
        tokens.push((start, token));
    }

    tokens.push((bytes.len(), Token::End));
    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Recursive-descent parser, one function per C precedence level.
struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Token {
        self.tokens[self.pos].1
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].0
    }

    fn bump(&mut self) -> Token {
        let token = self.peek();
        if token != Token::End {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, want: Token, what: &str) -> Result<()> {
        if self.peek() == want {
            self.bump();
            Ok(())
        } else {
            Err(syntax(self.offset(), format!("expected {}", what)))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(syntax(self.offset(), "expression nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn node(&self, expr: Expr) -> Result<Expr> {
        if expr.height() > MAX_TREE_HEIGHT as usize {
            return Err(syntax(self.offset(), "expression too long"));
        }
        Ok(expr)
    }

    fn parse(mut self) -> Result<Expr> {
        let expr = self.ternary()?;
        if self.peek() != Token::End {
            return Err(syntax(self.offset(), "unexpected trailing input"));
        }
        Ok(expr)
    }

    // ternary := or ( '?' ternary ':' ternary )?
    fn ternary(&mut self) -> Result<Expr> {
        self.enter()?;
        let cond = self.binary(0)?;
        let expr = if self.peek() == Token::Question {
            self.bump();
            let then = self.ternary()?;
            self.expect(Token::Colon, "':'")?;
            let otherwise = self.ternary()?;
            self.node(Expr::Ternary(
                Box::new(cond),
                Box::new(then),
                Box::new(otherwise),
            ))?
        } else {
            cond
        };
        self.leave();
        Ok(expr)
    }

    /// Left-associative binary levels, lowest precedence first.
    fn binary(&mut self, level: usize) -> Result<Expr> {
        const LEVELS: [&[BinaryOp]; 6] = [
            &[BinaryOp::Or],
            &[BinaryOp::And],
            &[BinaryOp::Eq, BinaryOp::Ne],
            &[BinaryOp::Ge, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Lt],
            &[BinaryOp::Add, BinaryOp::Sub],
            &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Rem],
        ];

        if level == LEVELS.len() {
            return self.unary();
        }

        let mut lhs = self.binary(level + 1)?;
        while let Token::Op(op) = self.peek() {
            if !LEVELS[level].contains(&op) {
                break;
            }
            self.bump();
            let rhs = self.binary(level + 1)?;
            lhs = self.node(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))?;
        }
        Ok(lhs)
    }

    // unary := '!' unary | primary
    fn unary(&mut self) -> Result<Expr> {
        if self.peek() == Token::Bang {
            self.bump();
            self.enter()?;
            let operand = self.unary()?;
            self.leave();
            return self.node(Expr::Not(Box::new(operand)));
        }
        self.primary()
    }

    // primary := number | 'n' | '(' ternary ')'
    fn primary(&mut self) -> Result<Expr> {
        let offset = self.offset();
        match self.bump() {
            Token::Number(v) => Ok(Expr::Literal(v)),
            Token::Var => Ok(Expr::N),
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::End => Err(syntax(offset, "unexpected end of expression")),
            other => Err(syntax(offset, format!("unexpected token {:?}", other))),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// A compiled plural expression.
///
/// Either holds a valid tree or is permanently invalid; an invalid
/// expression fails every evaluation.
#[derive(Debug, Clone)]
pub struct PluralExpr {
    source: String,
    root: Option<Arc<Expr>>,
}

impl PluralExpr {
    /// Compile an expression, reporting the syntax error on failure.
    pub fn compile(text: &str) -> Result<Self> {
        let tokens = tokenize(text)?;
        let root = Parser {
            tokens,
            pos: 0,
            nesting: 0,
        }
        .parse()?;

        Ok(Self {
            source: text.to_string(),
            root: Some(Arc::new(root)),
        })
    }

    /// Compile an expression, keeping an invalid object on failure.
    pub fn new(text: &str) -> Self {
        Self::compile(text).unwrap_or_else(|_| Self {
            source: text.to_string(),
            root: None,
        })
    }

    /// Whether compilation succeeded.
    pub fn is_valid(&self) -> bool {
        self.root.is_some()
    }

    /// The expression text as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled tree, if valid.
    pub fn ast(&self) -> Option<&Expr> {
        self.root.as_deref()
    }

    /// Evaluate with the default depth bound.
    pub fn eval(&self, n: u64) -> std::result::Result<u64, EvalError> {
        self.eval_with_depth(n, DEFAULT_MAX_DEPTH)
    }

    /// Evaluate with an explicit depth bound.
    pub fn eval_with_depth(&self, n: u64, max_depth: u32) -> std::result::Result<u64, EvalError> {
        match &self.root {
            Some(root) => root.eval_at(n, 0, max_depth),
            None => Err(EvalError::Invalid),
        }
    }
}

/// A catalog's plural rule: the number of forms and the selecting expression.
#[derive(Debug, Clone)]
pub struct PluralRule {
    nplurals: u32,
    expr: PluralExpr,
}

impl PluralRule {
    /// Build a rule from parts. `nplurals` must be positive and `expr` valid.
    pub fn new(nplurals: u32, expr: PluralExpr) -> Result<Self> {
        if nplurals == 0 {
            return Err(IntlError::InvalidPluralMetadata(
                "nplurals must be positive".to_string(),
            ));
        }
        if !expr.is_valid() {
            return Err(IntlError::InvalidPluralMetadata(format!(
                "plural expression does not compile: {}",
                expr.source()
            )));
        }
        Ok(Self { nplurals, expr })
    }

    /// Parse the value of a `Plural-Forms` header, e.g.
    /// `nplurals=2; plural=(n != 1);`.
    pub fn parse(value: &str) -> Result<Self> {
        let mut nplurals = None;
        let mut plural = None;

        for chunk in value.split(';') {
            if let Some((key, val)) = chunk.split_once('=') {
                match key.trim() {
                    "nplurals" => nplurals = Some(val.trim()),
                    "plural" => plural = Some(val.trim()),
                    _ => {}
                }
            }
        }

        let nplurals = nplurals
            .ok_or_else(|| IntlError::InvalidPluralMetadata("missing nplurals".to_string()))?;
        let plural = plural
            .ok_or_else(|| IntlError::InvalidPluralMetadata("missing plural".to_string()))?;

        let count = parse_count(nplurals).ok_or_else(|| {
            IntlError::InvalidPluralMetadata(format!("bad nplurals value '{}'", nplurals))
        })?;
        let expr = PluralExpr::compile(plural)
            .map_err(|e| IntlError::InvalidPluralMetadata(e.to_string()))?;

        Self::new(count, expr)
    }

    /// Number of plural forms.
    pub fn nplurals(&self) -> u32 {
        self.nplurals
    }

    /// The selecting expression.
    pub fn expr(&self) -> &PluralExpr {
        &self.expr
    }

    /// Form index for `n`, failing on evaluation errors and on indexes not
    /// below `nplurals`.
    pub fn index(&self, n: u64, max_depth: u32) -> Result<u64> {
        let index = self.expr.eval_with_depth(n, max_depth)?;
        if index >= u64::from(self.nplurals) {
            return Err(IntlError::IndexOutOfRange {
                index,
                nplurals: self.nplurals,
            });
        }
        Ok(index)
    }

    /// Form index used when a catalog has no rule: `n != 1`.
    pub fn default_index(n: u64) -> u64 {
        (n != 1) as u64
    }
}

/// Decimal digits only, no sign, no overflow.
fn parse_count(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str, n: u64) -> std::result::Result<u64, EvalError> {
        PluralExpr::compile(text).unwrap().eval(n)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("n+100", 1), Ok(101));
        assert_eq!(eval("n-100", 101), Ok(1));
        assert_eq!(eval("n*2", 123), Ok(246));
        assert_eq!(eval("n/2", 123), Ok(61));
        assert_eq!(eval("n%100", 1234), Ok(34));
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(eval("n-1", 0), Ok(u64::MAX));
        assert_eq!(eval("n+1", u64::MAX), Ok(0));
    }

    #[test]
    fn test_division_by_zero_fails() {
        assert_eq!(eval("2/n", 0), Err(EvalError::DivisionByZero));
        assert_eq!(eval("2%n", 0), Err(EvalError::DivisionByZero));
        assert_eq!(eval("2/n", 2), Ok(1));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("n==100", 0), Ok(0));
        assert_eq!(eval("n==100", 100), Ok(1));
        assert_eq!(eval("n!=100", 0), Ok(1));
        assert_eq!(eval("n!=100", 100), Ok(0));
        assert_eq!(eval("n>=100", 99), Ok(0));
        assert_eq!(eval("n>=100", 100), Ok(1));
        assert_eq!(eval("n<=100", 100), Ok(1));
        assert_eq!(eval("n<=100", 101), Ok(0));
        assert_eq!(eval("n>100", 100), Ok(0));
        assert_eq!(eval("n>100", 101), Ok(1));
        assert_eq!(eval("n<100", 99), Ok(1));
        assert_eq!(eval("n<100", 100), Ok(0));
    }

    #[test]
    fn test_short_circuit_and() {
        assert_eq!(eval("n&&(n/0)", 0), Ok(0));
        assert_eq!(eval("n&&(n/0)", 100), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_short_circuit_or() {
        assert_eq!(eval("n||(n/0)", 100), Ok(1));
        assert_eq!(eval("n||(n/0)", 0), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_not() {
        assert_eq!(eval("!n", 0), Ok(1));
        assert_eq!(eval("!n", 100), Ok(0));
        assert_eq!(eval("!!n", 7), Ok(1));
    }

    #[test]
    fn test_ternary_evaluates_selected_branch_only() {
        assert_eq!(eval("n?123:(n/0)", 100), Ok(123));
        assert_eq!(eval("n?123:(n/0)", 0), Err(EvalError::DivisionByZero));
        assert_eq!(eval("n?(n/0):123", 100), Err(EvalError::DivisionByZero));
        assert_eq!(eval("n?(n/0):123", 0), Ok(123));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+6/3", 0), Ok(4));
        assert_eq!(eval("(2+6)/3", 0), Ok(2));
        assert_eq!(eval("n?2:3?4:5", 1), Ok(2));
        assert_eq!(eval("n?2:3?4:5", 0), Ok(4));
        assert_eq!(eval("1 || 0 && 0", 0), Ok(1));
        assert_eq!(eval("10-2-3", 0), Ok(5));
    }

    #[test]
    fn test_tree_shape() {
        let expr = PluralExpr::compile("n%10==1 && n%100!=11").unwrap();
        assert_eq!(
            expr.ast().unwrap().to_string(),
            "(((n % 10) == 1) && ((n % 100) != 11))"
        );

        let expr = PluralExpr::compile("a").err().unwrap();
        assert!(matches!(expr, IntlError::ExpressionSyntax { position: 0, .. }));
    }

    #[test]
    fn test_syntax_errors() {
        for bad in ["", "n +", "(n", "n)", "n ? 1", "n = 1", "n & 1", "n | 1", "x", "1 2", "-n"] {
            assert!(PluralExpr::compile(bad).is_err(), "accepted {:?}", bad);
        }
        assert!(PluralExpr::compile("99999999999999999999999").is_err());
    }

    #[test]
    fn test_invalid_expression_always_fails() {
        let expr = PluralExpr::new("n +");
        assert!(!expr.is_valid());
        assert_eq!(expr.eval(0), Err(EvalError::Invalid));
        assert_eq!(expr.eval(1), Err(EvalError::Invalid));
    }

    #[test]
    fn test_depth_bound() {
        let nested = format!("{}n{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(eval(&nested, 5), Ok(5));

        let chain = vec!["n"; 70].join("+");
        let expr = PluralExpr::compile(&chain).unwrap();
        assert_eq!(expr.eval(1), Err(EvalError::DepthExceeded));
        assert_eq!(expr.eval_with_depth(1, 128), Ok(70));
    }

    #[test]
    fn test_tallest_tree_fits_largest_depth() {
        let tallest = vec!["n"; MAX_TREE_HEIGHT as usize].join("+");
        let expr = PluralExpr::compile(&tallest).unwrap();
        assert_eq!(expr.eval_with_depth(1, MAX_TREE_HEIGHT), Ok(MAX_TREE_HEIGHT as u64));
        assert_eq!(
            expr.eval_with_depth(1, MAX_TREE_HEIGHT - 1),
            Err(EvalError::DepthExceeded)
        );

        let taller = vec!["n"; MAX_TREE_HEIGHT as usize + 1].join("+");
        assert!(PluralExpr::compile(&taller).is_err());
    }

    #[test]
    fn test_pathological_input_is_rejected() {
        let deep = format!("{}n{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(PluralExpr::compile(&deep).is_err());

        let long = vec!["1"; 10_000].join("+");
        assert!(PluralExpr::compile(&long).is_err());

        let nots = format!("{}n", "!".repeat(10_000));
        assert!(PluralExpr::compile(&nots).is_err());
    }

    #[test]
    fn test_rule_parse() {
        let rule = PluralRule::parse("nplurals=3; plural=(n==0?0:n==1?1:2);").unwrap();
        assert_eq!(rule.nplurals(), 3);
        assert_eq!(rule.index(0, DEFAULT_MAX_DEPTH).unwrap(), 0);
        assert_eq!(rule.index(1, DEFAULT_MAX_DEPTH).unwrap(), 1);
        assert_eq!(rule.index(2, DEFAULT_MAX_DEPTH).unwrap(), 2);
        assert_eq!(rule.index(3, DEFAULT_MAX_DEPTH).unwrap(), 2);
    }

    #[test]
    fn test_rule_parse_failures() {
        assert!(PluralRule::parse("plural=n!=1;").is_err());
        assert!(PluralRule::parse("nplurals=2;").is_err());
        assert!(PluralRule::parse("nplurals=0; plural=0;").is_err());
        assert!(PluralRule::parse("nplurals=-2; plural=n!=1;").is_err());
        assert!(PluralRule::parse("nplurals=two; plural=n!=1;").is_err());
        assert!(PluralRule::parse("nplurals=2; plural=n!=;").is_err());
    }

    #[test]
    fn test_rule_index_out_of_range() {
        let rule = PluralRule::parse("nplurals=2; plural=n;").unwrap();
        assert_eq!(rule.index(1, DEFAULT_MAX_DEPTH).unwrap(), 1);
        assert!(matches!(
            rule.index(2, DEFAULT_MAX_DEPTH),
            Err(IntlError::IndexOutOfRange { index: 2, nplurals: 2 })
        ));
    }

    #[test]
    fn test_default_index() {
        assert_eq!(PluralRule::default_index(0), 1);
        assert_eq!(PluralRule::default_index(1), 0);
        assert_eq!(PluralRule::default_index(2), 1);
    }

    #[test]
    fn test_common_language_rules() {
        let ne = PluralExpr::compile("n != 1").unwrap();
        assert_eq!(ne.eval(0), Ok(1));
        assert_eq!(ne.eval(1), Ok(0));
        assert_eq!(ne.eval(2), Ok(1));

        let polish = PluralExpr::compile(
            "(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)",
        )
        .unwrap();
        assert_eq!(polish.eval(1), Ok(0));
        assert_eq!(polish.eval(2), Ok(1));
        assert_eq!(polish.eval(5), Ok(2));
        assert_eq!(polish.eval(22), Ok(1));
        assert_eq!(polish.eval(12), Ok(2));
    }

    mod props {
        use crate::EvalError;
        use crate::plural::{PluralExpr, PluralRule};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn short_circuit_guards_division(n in any::<u64>()) {
                let and = PluralExpr::compile("n && (n/0)").unwrap();
                let or = PluralExpr::compile("!n || n%0").unwrap();
                if n == 0 {
                    prop_assert_eq!(and.eval(n), Ok(0));
                    prop_assert_eq!(or.eval(n), Ok(1));
                } else {
                    prop_assert_eq!(and.eval(n), Err(EvalError::DivisionByZero));
                    prop_assert_eq!(or.eval(n), Err(EvalError::DivisionByZero));
                }
            }

            #[test]
            fn default_rule_matches_not_one(n in any::<u64>()) {
                let expr = PluralExpr::compile("n != 1").unwrap();
                prop_assert_eq!(expr.eval(n), Ok(PluralRule::default_index(n)));
                prop_assert_eq!(PluralRule::default_index(n) == 0, n == 1);
            }
        }
    }
}
