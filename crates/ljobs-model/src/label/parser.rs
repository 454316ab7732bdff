//! Recursive-descent parser for label expressions.
//!
//! Precedence, lowest first: `<->`, `->`, `||`, `&&`, `!`.
//! `->` associates to the right, the other binary operators to the left.
use super::{
    LabelAtom,
    expr::LabelExpr,
    lexer::{Spanned, Token, tokenize},
};
use crate::error::{ModelError, ModelResult};

/// Deepest run of parentheses, negations and implications accepted.
const MAX_NESTING: usize = 128;

/// Deepest expression tree accepted, counting operator chains such as `a||b||c`.
const MAX_DEPTH: usize = 512;

const TOO_DEEP: &str = "expression nested too deeply";

/// Parsed subexpression and the depth of its tree.
type Parsed = (LabelExpr, usize);

pub(crate) fn parse(input: &str) -> ModelResult<LabelExpr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ModelError::syntax(input, 0, "empty label expression"));
    }

    let mut parser = Parser {
        input,
        tokens,
        cursor: 0,
        nesting: 0,
    };
    let (expr, _) = parser.iff()?;

    match parser.peek() {
        None => Ok(expr),
        Some(next) => Err(ModelError::syntax(
            input,
            next.offset,
            format!("unexpected {}", next.token),
        )),
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Spanned>,
    cursor: usize,
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    /// Offset of the next token, or the end of input.
    fn offset(&self) -> usize {
        self.peek().map_or(self.input.len(), |s| s.offset)
    }

    fn eat(&mut self, want: &Token) -> bool {
        if self.peek().is_some_and(|s| &s.token == want) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Depth of a node whose deepest child has depth `child`.
    fn deeper(&self, child: usize, offset: usize) -> ModelResult<usize> {
        if child >= MAX_DEPTH {
            return Err(ModelError::syntax(self.input, offset, TOO_DEEP));
        }
        Ok(child + 1)
    }

    /// Run `f` one nesting level down, failing before recursing past [`MAX_NESTING`].
    fn nested(
        &mut self,
        offset: usize,
        f: impl FnOnce(&mut Self) -> ModelResult<Parsed>,
    ) -> ModelResult<Parsed> {
        if self.nesting >= MAX_NESTING {
            return Err(ModelError::syntax(self.input, offset, TOO_DEEP));
        }
        self.nesting += 1;
        let parsed = f(self)?;
        self.nesting -= 1;
        Ok(parsed)
    }

    fn iff(&mut self) -> ModelResult<Parsed> {
        let (mut lhs, mut depth) = self.implies()?;
        loop {
            let at = self.offset();
            if !self.eat(&Token::Iff) {
                break;
            }
            let (rhs, rhs_depth) = self.implies()?;
            depth = self.deeper(depth.max(rhs_depth), at)?;
            lhs = LabelExpr::Iff(Box::new(lhs), Box::new(rhs));
        }
        Ok((lhs, depth))
    }

    fn implies(&mut self) -> ModelResult<Parsed> {
        let (lhs, lhs_depth) = self.or()?;
        let at = self.offset();
        if self.eat(&Token::Implies) {
            let (rhs, rhs_depth) = self.nested(at, |p| p.implies())?;
            let depth = self.deeper(lhs_depth.max(rhs_depth), at)?;
            return Ok((LabelExpr::Implies(Box::new(lhs), Box::new(rhs)), depth));
        }
        Ok((lhs, lhs_depth))
    }

    fn or(&mut self) -> ModelResult<Parsed> {
        let (mut lhs, mut depth) = self.and()?;
        loop {
            let at = self.offset();
            if !self.eat(&Token::Or) {
                break;
            }
            let (rhs, rhs_depth) = self.and()?;
            depth = self.deeper(depth.max(rhs_depth), at)?;
            lhs = LabelExpr::or(lhs, rhs);
        }
        Ok((lhs, depth))
    }

    fn and(&mut self) -> ModelResult<Parsed> {
        let (mut lhs, mut depth) = self.unary()?;
        loop {
            let at = self.offset();
            if !self.eat(&Token::And) {
                break;
            }
            let (rhs, rhs_depth) = self.unary()?;
            depth = self.deeper(depth.max(rhs_depth), at)?;
            lhs = LabelExpr::and(lhs, rhs);
        }
        Ok((lhs, depth))
    }

    fn unary(&mut self) -> ModelResult<Parsed> {
        let at = self.offset();
        if self.eat(&Token::Not) {
            let (inner, depth) = self.nested(at, |p| p.unary())?;
            return Ok((LabelExpr::not(inner), self.deeper(depth, at)?));
        }
        self.primary()
    }

    fn primary(&mut self) -> ModelResult<Parsed> {
        let Some(next) = self.tokens.get(self.cursor).cloned() else {
            return Err(ModelError::syntax(
                self.input,
                self.input.len(),
                "unexpected end of expression",
            ));
        };
        self.cursor += 1;

        match next.token {
            Token::Atom(name) => Ok((LabelExpr::Atom(LabelAtom::new(name)), 1)),
            Token::LParen => {
                let (inner, depth) = self.nested(next.offset, |p| p.iff())?;
                if !self.eat(&Token::RParen) {
                    return Err(ModelError::syntax(
                        self.input,
                        next.offset,
                        "unbalanced '('",
                    ));
                }
                Ok((LabelExpr::paren(inner), self.deeper(depth, next.offset)?))
            }
            other => Err(ModelError::syntax(
                self.input,
                next.offset,
                format!("expected a label atom, found {other}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> LabelExpr {
        LabelExpr::Atom(LabelAtom::new(name))
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let parsed = parse("a || b && c").unwrap();
        assert_eq!(
            parsed,
            LabelExpr::or(atom("a"), LabelExpr::and(atom("b"), atom("c")))
        );
    }

    #[test]
    fn not_binds_tighter_than_and() {
        let parsed = parse("!a && b").unwrap();
        assert_eq!(parsed, LabelExpr::and(LabelExpr::not(atom("a")), atom("b")));
    }

    #[test]
    fn parentheses_are_kept() {
        let parsed = parse("!(a||b)").unwrap();
        assert_eq!(
            parsed,
            LabelExpr::not(LabelExpr::paren(LabelExpr::or(atom("a"), atom("b"))))
        );
    }

    #[test]
    fn implies_is_right_associative() {
        let parsed = parse("a -> b -> c").unwrap();
        assert_eq!(
            parsed,
            LabelExpr::Implies(
                Box::new(atom("a")),
                Box::new(LabelExpr::Implies(Box::new(atom("b")), Box::new(atom("c"))))
            )
        );
    }

    #[test]
    fn rejects_malformed_input() {
        let bad = [
            "", "   ", "a &&", "&& a", "(a", "a)", "()", "a b", "!", "a || || b", "a <-> ",
        ];
        for input in bad {
            assert!(
                parse(input).is_err(),
                "expected syntax error for {input:?}"
            );
        }
    }

    #[test]
    fn rejects_deep_nesting() {
        let parens = format!("{}a{}", "(".repeat(200_000), ")".repeat(200_000));
        let negations = format!("{}a", "!".repeat(200_000));
        let implications = format!("{}a", "a->".repeat(50_000));
        let chain = format!("{}a", "a&&".repeat(50_000));

        for input in [&parens, &negations, &implications, &chain] {
            match parse(input) {
                Err(ModelError::Syntax { reason, .. }) => {
                    assert!(reason.contains("nested too deeply"), "unexpected reason: {reason}")
                }
                other => panic!("expected syntax error, got {other:?}"),
            }
        }
    }

    #[test]
    fn accepts_nesting_below_the_limit() {
        let parens = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        assert!(parse(&parens).is_ok());

        let chain = format!("{}a", "a||".repeat(400));
        assert!(parse(&chain).is_ok());
    }

    #[test]
    fn unbalanced_paren_points_at_open_paren() {
        match parse("x && (a || b") {
            Err(ModelError::Syntax { offset, reason, .. }) => {
                assert_eq!(offset, 5);
                assert!(reason.contains("unbalanced"), "unexpected reason: {reason}");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
