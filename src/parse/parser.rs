use crate::config::config;
use crate::error::{Error, Result};
use crate::parse::ast::*;
use crate::sql::{Keyword, Token, TokenKind};

/// Recursive-descent parser over the token stream.
///
/// Syntactic roles fall out of which parsing routine consumes a token:
/// anything that goes through `parse_ident` or the name path is in
/// identifier position (original casing preserved, even for
/// keyword-spelled words), a name directly followed by `(` is in
/// function-name position, and the clause routines define the clause
/// boundaries the printer breaks lines on.
///
/// The parser carries the source text alongside the tokens so it can
/// recover the original spelling of keyword-spelled identifiers from
/// their spans.
///
/// Recursion depth is bounded by `config().max_depth`; blowing the bound
/// is an ordinary parse failure (`Error::DepthExceeded`), which the
/// driver turns into the return-input-unchanged fallback.
pub struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    limit: usize,
    pending_angle_closes: u8,
}

/// Binding powers for the expression grammar. Exact relative ordering
/// only matters for where expressions *stop* (clause keywords are never
/// infix), since the printer re-emits operators in source order.
const OR_BP: u8 = 1;
const AND_BP: u8 = 2;
const NOT_BP: u8 = 3;
const ARROW_BP: u8 = 3;
const CMP_BP: u8 = 4;
const ADD_BP: u8 = 5;
const MUL_BP: u8 = 6;
const UNARY_BP: u8 = 7;

/// Parse one statement's tokens (no `;` inside) into a `Query`.
pub fn parse_statement(src: &str, tokens: &[Token]) -> Result<Query> {
    let mut parser = Parser::new(src, tokens);
    let leading_comments = parser.take_leading_comments();
    let mut query = parser.parse_query()?;
    parser.expect_end()?;
    query.leading_comments = leading_comments;
    Ok(query)
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
            depth: 0,
            limit: config().max_depth,
            pending_angle_closes: 0,
        }
    }

    // ---- token cursor ----

    fn peek(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        tokens[self.pos..].iter().find(|t| !t.kind.is_comment())
    }

    fn peek2(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_comment())
            .nth(1)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        while let Some(t) = tokens.get(self.pos) {
            self.pos += 1;
            if !t.kind.is_comment() {
                return Some(t);
            }
        }
        None
    }

    fn text(&self, t: &Token) -> &'a str {
        let src: &'a str = self.src;
        &src[t.start..t.end]
    }

    fn peek_keyword(&self, kw: Keyword) -> bool {
        self.peek().is_some_and(|t| t.kind.is_keyword(kw))
    }

    fn peek_symbol(&self, symbol: &str) -> bool {
        self.peek().is_some_and(|t| t.kind.is_symbol(symbol))
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.peek_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.peek_symbol(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kw BY` when both are present; a lone `kw` stays put so it
    /// can be an identifier.
    fn eat_by_pair(&mut self, kw: Keyword) -> bool {
        if self.peek_keyword(kw) && self.peek2().is_some_and(|t| t.kind.is_keyword(Keyword::By)) {
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.unexpected(kw.as_str()))
        }
    }

    fn expect_symbol(&mut self, symbol: &'static str) -> Result<()> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.unexpected(symbol))
        }
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek() {
            Some(t) => Err(Error::Parse {
                found: self.text(t).to_string(),
                offset: t.start,
                expected: "end of statement",
            }),
            None => Ok(()),
        }
    }

    fn unexpected(&self, expected: &'static str) -> Error {
        match self.peek() {
            Some(t) => Error::Parse {
                found: self.text(t).to_string(),
                offset: t.start,
                expected,
            },
            None => Error::UnexpectedEnd { expected },
        }
    }

    // ---- depth guard ----

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.limit {
            return Err(Error::DepthExceeded { limit: self.limit });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ---- comments ----

    fn take_leading_comments(&mut self) -> Vec<String> {
        let mut comments = Vec::new();
        while let Some(t) = self.tokens.get(self.pos) {
            match t.kind.comment() {
                Some(text) => {
                    comments.push(text.to_string());
                    self.pos += 1;
                }
                None => break,
            }
        }
        comments
    }

    /// A `/*+ ... */` block comment directly after SELECT is a query hint.
    fn take_hint(&mut self) -> Option<String> {
        if let Some(t) = self.tokens.get(self.pos) {
            if let TokenKind::BlockComment(text) = &t.kind {
                if text.starts_with("/*+") {
                    let hint = text.clone();
                    self.pos += 1;
                    return Some(hint);
                }
            }
        }
        None
    }

    // ---- identifiers ----

    fn parse_ident(&mut self, expected: &'static str) -> Result<Ident> {
        let Some(t) = self.peek() else {
            return Err(Error::UnexpectedEnd { expected });
        };
        let ident = match &t.kind {
            TokenKind::Ident(s) => Ident::Plain(s.clone()),
            TokenKind::QuotedIdent(s) => Ident::Quoted(s.clone()),
            TokenKind::Keyword(kw) if kw.is_soft() => Ident::Plain(self.text(t).to_string()),
            _ => return Err(self.unexpected(expected)),
        };
        self.advance();
        Ok(ident)
    }

    /// True when the peeked token can serve as a bare (AS-less) alias.
    fn peek_bare_alias(&self) -> bool {
        match self.peek() {
            Some(t) => match &t.kind {
                TokenKind::Ident(_) | TokenKind::QuotedIdent(_) => true,
                TokenKind::Keyword(kw) => {
                    kw.is_soft()
                        && !(kw.starts_by_pair()
                            && self.peek2().is_some_and(|n| n.kind.is_keyword(Keyword::By)))
                }
                _ => false,
            },
            None => false,
        }
    }

    // ---- statement structure ----

    fn parse_query(&mut self) -> Result<Query> {
        self.enter()?;
        let result = self.parse_query_inner();
        self.leave();
        result
    }

    fn parse_query_inner(&mut self) -> Result<Query> {
        let with = if self.eat_keyword(Keyword::With) {
            Some(self.parse_with()?)
        } else {
            None
        };
        let first = self.parse_select()?;
        let mut ops = Vec::new();
        while let Some(op) = self.parse_set_operator() {
            ops.push((op, self.parse_select()?));
        }
        Ok(Query {
            leading_comments: Vec::new(),
            with,
            body: QueryBody { first, ops },
        })
    }

    fn parse_with(&mut self) -> Result<With> {
        let mut bindings = Vec::new();
        loop {
            let name = self.parse_ident("common table expression name")?;
            self.expect_keyword(Keyword::As)?;
            self.expect_symbol("(")?;
            let query = self.parse_query()?;
            self.expect_symbol(")")?;
            bindings.push(CteBinding {
                name,
                query: Box::new(query),
            });
            if !self.eat_symbol(",") {
                break;
            }
        }
        Ok(With { bindings })
    }

    fn parse_set_operator(&mut self) -> Option<SetOp> {
        if self.eat_keyword(Keyword::Union) {
            Some(if self.eat_keyword(Keyword::All) {
                SetOp::UnionAll
            } else {
                self.eat_keyword(Keyword::Distinct);
                SetOp::Union
            })
        } else if self.eat_keyword(Keyword::Intersect) {
            Some(if self.eat_keyword(Keyword::All) {
                SetOp::IntersectAll
            } else {
                self.eat_keyword(Keyword::Distinct);
                SetOp::Intersect
            })
        } else if self.eat_keyword(Keyword::Except) {
            Some(if self.eat_keyword(Keyword::All) {
                SetOp::ExceptAll
            } else {
                self.eat_keyword(Keyword::Distinct);
                SetOp::Except
            })
        } else {
            None
        }
    }

    fn parse_select(&mut self) -> Result<Select> {
        self.expect_keyword(Keyword::Select)?;
        let hint = self.take_hint();
        let distinct = if self.eat_keyword(Keyword::Distinct) {
            true
        } else {
            self.eat_keyword(Keyword::All);
            false
        };

        let mut items = vec![self.parse_select_item()?];
        while self.eat_symbol(",") {
            items.push(self.parse_select_item()?);
        }

        let from = if self.eat_keyword(Keyword::From) {
            Some(self.parse_from()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_cond_list()?)
        } else {
            None
        };
        let group_by = if self.eat_by_pair(Keyword::Group) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.parse_cond_list()?)
        } else {
            None
        };
        let order_by = if self.eat_by_pair(Keyword::Order) {
            self.parse_order_items()?
        } else {
            Vec::new()
        };
        let cluster_by = if self.eat_by_pair(Keyword::Cluster) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        let distribute_by = if self.eat_by_pair(Keyword::Distribute) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        let sort_by = if self.eat_by_pair(Keyword::Sort) {
            self.parse_order_items()?
        } else {
            Vec::new()
        };
        let limit = if self.eat_keyword(Keyword::Limit) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let offset = if self.eat_keyword(Keyword::Offset) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };

        Ok(Select {
            hint,
            distinct,
            items,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            cluster_by,
            distribute_by,
            sort_by,
            limit,
            offset,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.peek_symbol("*") {
            self.advance();
            return Ok(SelectItem {
                expr: Expr::Star,
                alias: None,
            });
        }
        let expr = self.parse_expr(0)?;
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.parse_ident("column alias")?)
        } else if self.peek_bare_alias() {
            Some(self.parse_ident("column alias")?)
        } else {
            None
        };
        Ok(SelectItem { expr, alias })
    }

    // ---- FROM / JOIN ----

    fn parse_from(&mut self) -> Result<FromClause> {
        let mut tables = vec![self.parse_table_source()?];
        while self.eat_symbol(",") {
            tables.push(self.parse_table_source()?);
        }
        let mut joins = Vec::new();
        while let Some(kind) = self.parse_join_kind()? {
            let source = self.parse_table_source()?;
            let mut on = None;
            let mut using = Vec::new();
            if self.eat_keyword(Keyword::On) {
                on = Some(self.parse_cond_list()?);
            } else if self.eat_keyword(Keyword::Using) {
                self.expect_symbol("(")?;
                loop {
                    using.push(self.parse_ident("column name")?);
                    if !self.eat_symbol(",") {
                        break;
                    }
                }
                self.expect_symbol(")")?;
            }
            joins.push(Join {
                kind,
                source,
                on,
                using,
            });
        }
        Ok(FromClause { tables, joins })
    }

    fn parse_table_source(&mut self) -> Result<TableSource> {
        if self.peek_symbol("(") {
            self.advance();
            let query = self.parse_query()?;
            self.expect_symbol(")")?;
            let alias = self.parse_table_alias()?;
            return Ok(TableSource::Derived {
                query: Box::new(query),
                alias,
            });
        }
        let mut parts = vec![self.parse_ident("table name")?];
        while self.peek_symbol(".") {
            self.advance();
            parts.push(self.parse_ident("name segment")?);
        }
        let alias = self.parse_table_alias()?;
        Ok(TableSource::Table {
            name: Name { parts },
            alias,
        })
    }

    fn parse_table_alias(&mut self) -> Result<Option<Ident>> {
        if self.eat_keyword(Keyword::As) {
            return Ok(Some(self.parse_ident("table alias")?));
        }
        if self.peek_bare_alias() {
            return Ok(Some(self.parse_ident("table alias")?));
        }
        Ok(None)
    }

    fn parse_join_kind(&mut self) -> Result<Option<JoinKind>> {
        let kind = if self.eat_keyword(Keyword::Join) {
            JoinKind::Inner
        } else if self.eat_keyword(Keyword::Inner) {
            self.expect_keyword(Keyword::Join)?;
            JoinKind::Inner
        } else if self.eat_keyword(Keyword::Left) {
            let kind = if self.eat_keyword(Keyword::Semi) {
                JoinKind::Semi
            } else if self.eat_keyword(Keyword::Anti) {
                JoinKind::Anti
            } else {
                self.eat_keyword(Keyword::Outer);
                JoinKind::Left
            };
            self.expect_keyword(Keyword::Join)?;
            kind
        } else if self.eat_keyword(Keyword::Right) {
            self.eat_keyword(Keyword::Outer);
            self.expect_keyword(Keyword::Join)?;
            JoinKind::Right
        } else if self.eat_keyword(Keyword::Full) {
            self.eat_keyword(Keyword::Outer);
            self.expect_keyword(Keyword::Join)?;
            JoinKind::Full
        } else if self.eat_keyword(Keyword::Cross) {
            self.expect_keyword(Keyword::Join)?;
            JoinKind::Cross
        } else {
            return Ok(None);
        };
        Ok(Some(kind))
    }

    // ---- conditions ----

    fn parse_cond_list(&mut self) -> Result<CondList> {
        let first = self.parse_expr(NOT_BP)?;
        let mut rest = Vec::new();
        loop {
            let connector = if self.eat_keyword(Keyword::And) {
                BoolConnector::And
            } else if self.eat_keyword(Keyword::Or) {
                BoolConnector::Or
            } else {
                break;
            };
            rest.push((connector, self.parse_expr(NOT_BP)?));
        }
        Ok(CondList { first, rest })
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
        let mut items = vec![self.parse_expr(0)?];
        while self.eat_symbol(",") {
            items.push(self.parse_expr(0)?);
        }
        Ok(items)
    }

    fn parse_order_items(&mut self) -> Result<Vec<OrderItem>> {
        let mut items = Vec::new();
        loop {
            let expr = self.parse_expr(0)?;
            let direction = if self.eat_keyword(Keyword::Asc) {
                Some(OrderDirection::Asc)
            } else if self.eat_keyword(Keyword::Desc) {
                Some(OrderDirection::Desc)
            } else {
                None
            };
            let nulls = if self.eat_keyword(Keyword::Nulls) {
                if self.eat_keyword(Keyword::First) {
                    Some(NullsOrder::First)
                } else if self.eat_keyword(Keyword::Last) {
                    Some(NullsOrder::Last)
                } else {
                    return Err(self.unexpected("FIRST or LAST"));
                }
            } else {
                None
            };
            items.push(OrderItem {
                expr,
                direction,
                nulls,
            });
            if !self.eat_symbol(",") {
                break;
            }
        }
        Ok(items)
    }

    // ---- expressions ----

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr> {
        self.enter()?;
        let result = self.parse_expr_at(min_bp);
        self.leave();
        result
    }

    fn parse_expr_at(&mut self, min_bp: u8) -> Result<Expr> {
        let mut left = self.parse_prefix()?;
        loop {
            // Postfix forms bind tightest and ignore precedence.
            if self.peek_symbol("::") {
                self.advance();
                let target = self.parse_type_top()?;
                left = Expr::Cast {
                    expr: Box::new(left),
                    target,
                };
                continue;
            }
            if self.peek_symbol("[") {
                self.advance();
                let index = self.parse_expr(0)?;
                self.expect_symbol("]")?;
                left = Expr::Subscript {
                    base: Box::new(left),
                    index: Box::new(index),
                };
                continue;
            }

            // Word operators live at comparison level.
            if min_bp <= CMP_BP {
                if self.eat_keyword(Keyword::Is) {
                    let negated = self.eat_keyword(Keyword::Not);
                    let value = self.parse_is_value()?;
                    left = Expr::Is {
                        expr: Box::new(left),
                        negated,
                        value,
                    };
                    continue;
                }
                let negates_next = self.peek_keyword(Keyword::Not)
                    && self.peek2().is_some_and(|t| {
                        matches!(
                            &t.kind,
                            TokenKind::Keyword(
                                Keyword::In | Keyword::Like | Keyword::Rlike | Keyword::Between
                            )
                        )
                    });
                if negates_next
                    || self.peek_keyword(Keyword::In)
                    || self.peek_keyword(Keyword::Like)
                    || self.peek_keyword(Keyword::Rlike)
                    || self.peek_keyword(Keyword::Between)
                {
                    if negates_next {
                        self.advance();
                    }
                    left = self.parse_comparison_tail(left, negates_next)?;
                    continue;
                }
            }

            let Some((op, bp)) = self.peek_binary_op() else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.advance();
            let right = self.parse_expr(bp + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_comparison_tail(&mut self, left: Expr, negated: bool) -> Result<Expr> {
        if self.eat_keyword(Keyword::In) {
            self.expect_symbol("(")?;
            if self.peek_keyword(Keyword::Select) || self.peek_keyword(Keyword::With) {
                let query = self.parse_query()?;
                self.expect_symbol(")")?;
                return Ok(Expr::InSubquery {
                    expr: Box::new(left),
                    negated,
                    query: Box::new(query),
                });
            }
            let mut items = vec![self.parse_expr(0)?];
            while self.eat_symbol(",") {
                items.push(self.parse_expr(0)?);
            }
            self.expect_symbol(")")?;
            return Ok(Expr::InList {
                expr: Box::new(left),
                negated,
                items,
            });
        }
        if self.eat_keyword(Keyword::Between) {
            let low = self.parse_expr(ADD_BP)?;
            self.expect_keyword(Keyword::And)?;
            let high = self.parse_expr(ADD_BP)?;
            return Ok(Expr::Between {
                expr: Box::new(left),
                negated,
                low: Box::new(low),
                high: Box::new(high),
            });
        }
        let keyword = if self.eat_keyword(Keyword::Like) {
            Keyword::Like
        } else if self.eat_keyword(Keyword::Rlike) {
            Keyword::Rlike
        } else {
            return Err(self.unexpected("IN, LIKE, RLIKE, or BETWEEN"));
        };
        let pattern = self.parse_expr(ADD_BP)?;
        Ok(Expr::Like {
            expr: Box::new(left),
            negated,
            keyword,
            pattern: Box::new(pattern),
        })
    }

    fn parse_is_value(&mut self) -> Result<IsValue> {
        if self.eat_keyword(Keyword::Null) {
            Ok(IsValue::Null)
        } else if self.eat_keyword(Keyword::True) {
            Ok(IsValue::True)
        } else if self.eat_keyword(Keyword::False) {
            Ok(IsValue::False)
        } else {
            Err(self.unexpected("NULL, TRUE, or FALSE"))
        }
    }

    fn peek_binary_op(&self) -> Option<(&'static str, u8)> {
        let t = self.peek()?;
        match &t.kind {
            TokenKind::Symbol(s) => {
                let bp = match *s {
                    "=" | "==" | "!=" | "<>" | "<" | "<=" | ">" | ">=" | "<=>" => CMP_BP,
                    "->" | "=>" | "|>" => ARROW_BP,
                    "+" | "-" | "||" | "&" | "|" | "^" | "<<" | ">>" | ">>>" => ADD_BP,
                    "*" | "/" | "%" => MUL_BP,
                    _ => return None,
                };
                Some((*s, bp))
            }
            TokenKind::Keyword(Keyword::And) => Some(("AND", AND_BP)),
            TokenKind::Keyword(Keyword::Or) => Some(("OR", OR_BP)),
            _ => None,
        }
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        if let Some(t) = self.peek() {
            if let TokenKind::Symbol(s) = &t.kind {
                if matches!(*s, "-" | "+" | "~" | "!") {
                    let op = *s;
                    self.advance();
                    let operand = self.parse_expr(UNARY_BP)?;
                    return Ok(Expr::Unary {
                        op,
                        operand: Box::new(operand),
                    });
                }
            }
            if t.kind.is_keyword(Keyword::Not) {
                self.advance();
                let operand = self.parse_expr(NOT_BP)?;
                return Ok(Expr::Not(Box::new(operand)));
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let Some(t) = self.peek() else {
            return Err(Error::UnexpectedEnd {
                expected: "expression",
            });
        };
        match &t.kind {
            TokenKind::Number(text) => {
                let expr = Expr::Number(text.clone());
                self.advance();
                Ok(expr)
            }
            TokenKind::StringLit(text) => {
                let expr = Expr::StringLit(text.clone());
                self.advance();
                Ok(expr)
            }
            TokenKind::Ident(text) => {
                let first = Ident::Plain(text.clone());
                self.advance();
                self.parse_name_expr(first)
            }
            TokenKind::QuotedIdent(text) => {
                let first = Ident::Quoted(text.clone());
                self.advance();
                self.parse_name_expr(first)
            }
            TokenKind::Keyword(kw) => self.parse_keyword_primary(*kw, t),
            TokenKind::Symbol("(") => {
                self.advance();
                if self.peek_keyword(Keyword::Select) || self.peek_keyword(Keyword::With) {
                    let query = self.parse_query()?;
                    self.expect_symbol(")")?;
                    Ok(Expr::Subquery(Box::new(query)))
                } else {
                    let inner = self.parse_expr(0)?;
                    self.expect_symbol(")")?;
                    Ok(Expr::Paren(Box::new(inner)))
                }
            }
            TokenKind::Symbol(_) => Err(self.unexpected("expression")),
            TokenKind::LineComment(_) | TokenKind::BlockComment(_) => {
                unreachable!("peek never yields comments")
            }
        }
    }

    fn parse_keyword_primary(&mut self, kw: Keyword, t: &Token) -> Result<Expr> {
        match kw {
            Keyword::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Keyword::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Keyword::Null => {
                self.advance();
                Ok(Expr::Null)
            }
            Keyword::Case => self.parse_case(),
            Keyword::Cast if self.peek2().is_some_and(|n| n.kind.is_symbol("(")) => {
                self.advance();
                self.expect_symbol("(")?;
                let expr = self.parse_expr(0)?;
                self.expect_keyword(Keyword::As)?;
                let target = self.parse_type_top()?;
                self.expect_symbol(")")?;
                Ok(Expr::CastCall {
                    expr: Box::new(expr),
                    target,
                })
            }
            Keyword::Exists if self.peek2().is_some_and(|n| n.kind.is_symbol("(")) => {
                self.advance();
                self.expect_symbol("(")?;
                let query = self.parse_query()?;
                self.expect_symbol(")")?;
                Ok(Expr::Exists(Box::new(query)))
            }
            Keyword::Date | Keyword::Timestamp
                if self
                    .peek2()
                    .is_some_and(|n| matches!(n.kind, TokenKind::StringLit(_))) =>
            {
                self.advance();
                let value = self.take_string_lit()?;
                Ok(Expr::TypedLit {
                    type_kw: kw,
                    value,
                    unit: None,
                })
            }
            Keyword::Interval
                if self
                    .peek2()
                    .is_some_and(|n| matches!(n.kind, TokenKind::StringLit(_))) =>
            {
                self.advance();
                let value = self.take_string_lit()?;
                let unit = self.take_interval_unit();
                Ok(Expr::TypedLit {
                    type_kw: kw,
                    value,
                    unit,
                })
            }
            kw if kw.is_soft() => {
                // A keyword spelling in identifier position stays an
                // identifier with its original casing, unless it opens a
                // BY clause right here.
                if kw.starts_by_pair()
                    && self.peek2().is_some_and(|n| n.kind.is_keyword(Keyword::By))
                {
                    return Err(self.unexpected("expression"));
                }
                let first = Ident::Plain(self.text(t).to_string());
                self.advance();
                self.parse_name_expr(first)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn take_string_lit(&mut self) -> Result<String> {
        match self.peek() {
            Some(t) => {
                if let TokenKind::StringLit(s) = &t.kind {
                    let value = s.clone();
                    self.advance();
                    Ok(value)
                } else {
                    Err(self.unexpected("string literal"))
                }
            }
            None => Err(Error::UnexpectedEnd {
                expected: "string literal",
            }),
        }
    }

    /// Time unit after `INTERVAL '...'`; only recognized unit words are
    /// consumed, so an alias after the literal is left alone.
    fn take_interval_unit(&mut self) -> Option<String> {
        let t = self.peek()?;
        let word = match &t.kind {
            TokenKind::Ident(s) => s.as_str(),
            _ => return None,
        };
        const UNITS: [&str; 18] = [
            "year",
            "years",
            "month",
            "months",
            "week",
            "weeks",
            "day",
            "days",
            "hour",
            "hours",
            "minute",
            "minutes",
            "second",
            "seconds",
            "millisecond",
            "milliseconds",
            "microsecond",
            "microseconds",
        ];
        if UNITS.contains(&word.to_ascii_lowercase().as_str()) {
            let unit = word.to_string();
            self.advance();
            Some(unit)
        } else {
            None
        }
    }

    fn parse_name_expr(&mut self, first: Ident) -> Result<Expr> {
        let mut parts = vec![first];
        while self.peek_symbol(".") {
            if self.peek2().is_some_and(|t| t.kind.is_symbol("*")) {
                self.advance();
                self.advance();
                return Ok(Expr::QualifiedStar(Name { parts }));
            }
            self.advance();
            parts.push(self.parse_ident("name segment")?);
        }
        if self.peek_symbol("(") {
            self.advance();
            let distinct = self.eat_keyword(Keyword::Distinct);
            let mut args = Vec::new();
            if !self.peek_symbol(")") {
                loop {
                    if self.peek_symbol("*") {
                        self.advance();
                        args.push(Expr::Star);
                    } else {
                        args.push(self.parse_expr(0)?);
                    }
                    if !self.eat_symbol(",") {
                        break;
                    }
                }
            }
            self.expect_symbol(")")?;
            return Ok(Expr::Call(FunctionCall {
                name: Name { parts },
                distinct,
                args,
            }));
        }
        Ok(Expr::Column(Name { parts }))
    }

    fn parse_case(&mut self) -> Result<Expr> {
        self.advance();
        let operand = if self.peek_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr(0)?))
        };
        let mut branches = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_expr(0)?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr(0)?;
            branches.push(CaseBranch { condition, result });
        }
        if branches.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_result = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr(0)?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(Expr::Case {
            operand,
            branches,
            else_result,
        })
    }

    // ---- types ----

    fn parse_type_top(&mut self) -> Result<TypeName> {
        let ty = self.parse_type()?;
        if self.pending_angle_closes > 0 {
            return Err(self.unexpected("balanced angle brackets"));
        }
        Ok(ty)
    }

    fn parse_type(&mut self) -> Result<TypeName> {
        let name = self.parse_type_word()?;
        self.parse_type_rest(name)
    }

    fn parse_type_word(&mut self) -> Result<String> {
        let Some(t) = self.peek() else {
            return Err(Error::UnexpectedEnd {
                expected: "type name",
            });
        };
        let name = match &t.kind {
            TokenKind::Ident(s) => s.clone(),
            TokenKind::Keyword(_) => self.text(t).to_string(),
            _ => return Err(self.unexpected("type name")),
        };
        self.advance();
        Ok(name)
    }

    fn parse_type_rest(&mut self, name: String) -> Result<TypeName> {
        let mut params = Vec::new();
        if self.eat_symbol("<") {
            loop {
                params.push(self.parse_type_param()?);
                if !self.eat_symbol(",") {
                    break;
                }
            }
            self.close_angle()?;
        }
        let mut args = Vec::new();
        if self.eat_symbol("(") {
            loop {
                let Some(t) = self.peek() else {
                    return Err(Error::UnexpectedEnd {
                        expected: "numeric type argument",
                    });
                };
                match &t.kind {
                    TokenKind::Number(n) => {
                        args.push(n.clone());
                        self.advance();
                    }
                    _ => return Err(self.unexpected("numeric type argument")),
                }
                if !self.eat_symbol(",") {
                    break;
                }
            }
            self.expect_symbol(")")?;
        }
        Ok(TypeName { name, params, args })
    }

    fn parse_type_param(&mut self) -> Result<TypeParam> {
        // STRUCT fields are `name:type`; anything else is a nested type.
        let field_name = self
            .peek2()
            .is_some_and(|n| n.kind.is_symbol(":"))
            .then(|| self.parse_ident("field name"))
            .transpose()?;
        match field_name {
            Some(name) => {
                self.expect_symbol(":")?;
                let ty = self.parse_type()?;
                Ok(TypeParam::Field { name, ty })
            }
            None => Ok(TypeParam::Type(self.parse_type()?)),
        }
    }

    /// Consume one closing angle bracket, splitting `>>`/`>>>` tokens
    /// into multiple closes when nested generic types end together.
    fn close_angle(&mut self) -> Result<()> {
        if self.pending_angle_closes > 0 {
            self.pending_angle_closes -= 1;
            return Ok(());
        }
        if self.eat_symbol(">") {
            return Ok(());
        }
        if self.eat_symbol(">>") {
            self.pending_angle_closes += 1;
            return Ok(());
        }
        if self.eat_symbol(">>>") {
            self.pending_angle_closes += 2;
            return Ok(());
        }
        Err(self.unexpected(">"))
    }
}
