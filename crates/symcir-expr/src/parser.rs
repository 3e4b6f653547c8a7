//! Expression parser with auto-symbol creation.
//!
//! Unrecognized identifiers become typed symbols (or undefined functions when
//! followed by an argument list). Newly created symbols are cached in a
//! caller-owned [`SymbolTable`] so repeated parses resolve identical names to
//! the same symbol.

use crate::error::{Error, Result};
use crate::expr::{Expr, Func};
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::symbol::{Assumptions, Symbol, SymbolTable, canonical_name};

/// True if the name is a built-in constant or function.
pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "pi" | "j"
            | "sin"
            | "cos"
            | "exp"
            | "log"
            | "sqrt"
            | "abs"
            | "atan2"
            | "Heaviside"
            | "u"
            | "DiracDelta"
            | "delta"
    )
}

/// Parse an expression string.
///
/// Free identifiers are canonicalized and resolved against `table`, creating
/// and caching a new symbol with the given default assumptions when absent.
pub fn parse(src: &str, table: &mut SymbolTable, assumptions: Assumptions) -> Result<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        table,
        assumptions,
    };
    let expr = parser.parse_expr(0)?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Return the free identifier names referenced by an expression string,
/// canonicalized, without creating or caching any symbols.
pub fn symbols_find(src: &str) -> Result<Vec<String>> {
    let tokens = tokenize(src)?;
    let mut names = Vec::new();
    for spanned in &tokens {
        if let Token::Name(name) = &spanned.token {
            if is_builtin(name) {
                continue;
            }
            let canon = canonical_name(name);
            if !names.contains(&canon) {
                names.push(canon);
            }
        }
    }
    Ok(names)
}

struct Parser<'a> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    table: &'a mut SymbolTable,
    assumptions: Assumptions,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn position(&self) -> usize {
        self.tokens[self.pos].position
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect_eof(&self) -> Result<()> {
        if !matches!(self.peek(), Token::Eof) {
            return Err(Error::Syntax {
                position: self.position(),
                message: format!("unexpected token {:?}", self.peek()),
            });
        }
        Ok(())
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let (op_bp, right_bp) = match self.peek() {
                Token::Plus | Token::Minus => (1, 2),
                Token::Star | Token::Slash => (3, 4),
                // Right associative: a^b^c = a^(b^c)
                Token::Caret => (6, 5),
                _ => break,
            };
            if op_bp < min_bp {
                break;
            }
            let op = self.advance();
            let rhs = self.parse_expr(right_bp)?;
            lhs = match op {
                Token::Plus => lhs + rhs,
                Token::Minus => lhs - rhs,
                Token::Star => lhs * rhs,
                Token::Slash => lhs / rhs,
                Token::Caret => Expr::pow(lhs, rhs),
                _ => unreachable!(),
            };
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let position = self.position();
        match self.advance() {
            Token::Number(value) => Ok(Expr::number(value)),
            Token::Minus => {
                let inner = self.parse_expr(3)?;
                Ok(-inner)
            }
            Token::Plus => self.parse_expr(3),
            Token::LParen => {
                let inner = self.parse_expr(0)?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Token::Name(name) => self.parse_name(&name, position),
            other => Err(Error::Syntax {
                position,
                message: format!("unexpected token {:?}", other),
            }),
        }
    }

    fn expect_rparen(&mut self) -> Result<()> {
        if !matches!(self.peek(), Token::RParen) {
            return Err(Error::Syntax {
                position: self.position(),
                message: "expected ')'".to_string(),
            });
        }
        self.advance();
        Ok(())
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        // Caller has seen the name; consume '(' and the argument list.
        self.advance();
        let mut args = vec![self.parse_expr(0)?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            args.push(self.parse_expr(0)?);
        }
        self.expect_rparen()?;
        Ok(args)
    }

    fn parse_name(&mut self, name: &str, position: usize) -> Result<Expr> {
        match name {
            "pi" => return Ok(Expr::number(std::f64::consts::PI)),
            "j" => return Ok(Expr::imaginary_unit()),
            _ => {}
        }

        if is_builtin(name) {
            let args = if matches!(self.peek(), Token::LParen) {
                self.parse_args()?
            } else {
                return Err(Error::Syntax {
                    position,
                    message: format!("built-in function {} requires arguments", name),
                });
            };
            return self.apply_builtin(name, args, position);
        }

        let canon = canonical_name(name);

        if matches!(self.peek(), Token::LParen) {
            let args = self.parse_args()?;
            return Ok(Expr::func(Func::User(canon), args));
        }

        if let Some(existing) = self.table.get(&canon) {
            return Ok(Expr::symbol(existing.clone()));
        }
        log::trace!("auto-creating symbol '{}'", canon);
        let symbol = Symbol::new(&canon, self.assumptions);
        self.table.insert(canon, symbol.clone());
        Ok(Expr::symbol(symbol))
    }

    fn apply_builtin(&self, name: &str, mut args: Vec<Expr>, position: usize) -> Result<Expr> {
        let arity = if name == "atan2" { 2 } else { 1 };
        if args.len() != arity {
            return Err(Error::Syntax {
                position,
                message: format!("{} expects {} argument(s), got {}", name, arity, args.len()),
            });
        }
        let first = args.remove(0);
        Ok(match name {
            "sin" => Expr::sin(first),
            "cos" => Expr::cos(first),
            "exp" => Expr::exp(first),
            "log" => Expr::func(Func::Log, vec![first]),
            "sqrt" => Expr::sqrt(first),
            "abs" => Expr::abs(first),
            "atan2" => Expr::atan2(first, args.remove(0)),
            "Heaviside" | "u" => Expr::heaviside(first),
            "DiracDelta" | "delta" => Expr::dirac_delta(first),
            _ => unreachable!(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn parse_one(src: &str) -> Expr {
        let mut table: SymbolTable = IndexMap::new();
        parse(src, &mut table, Assumptions::default()).unwrap()
    }

    #[test]
    fn test_parse_precedence() {
        let e = parse_one("1 + 2*3");
        assert_eq!(e, Expr::from(7.0));
        let e = parse_one("(1 + 2)*3");
        assert_eq!(e, Expr::from(9.0));
        let e = parse_one("2^3^2");
        assert_eq!(e, Expr::from(512.0));
    }

    #[test]
    fn test_parse_caches_symbols() {
        let mut table: SymbolTable = IndexMap::new();
        let a = parse("R1 + 1", &mut table, Assumptions::default()).unwrap();
        let b = parse("R_1 + 1", &mut table, Assumptions::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("R_1"));
    }

    #[test]
    fn test_parse_user_function() {
        let e = parse_one("v(t)");
        match e {
            Expr::Func(Func::User(name), args) => {
                assert_eq!(name, "v");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected user function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unary_minus() {
        let e = parse_one("-4 + 4");
        assert!(e.is_zero());
    }

    #[test]
    fn test_parse_imaginary_unit() {
        let e = parse_one("j*j");
        assert_eq!(e, Expr::from(-1.0));
    }

    #[test]
    fn test_symbols_find() {
        let names = symbols_find("a*cos(omega*t) + v(x)").unwrap();
        assert_eq!(names, vec!["a", "omega", "t", "v", "x"]);
    }

    #[test]
    fn test_parse_error_propagates() {
        let mut table: SymbolTable = IndexMap::new();
        let err = parse("3 +", &mut table, Assumptions::default());
        assert!(matches!(err, Err(Error::Syntax { .. })));
    }
}
