//! Statement tree produced by the parser and consumed by the printer.
//!
//! Every enum here is closed on purpose: the printer matches on each of
//! them exhaustively, so adding a variant without a rendering rule is a
//! compile error rather than a silently dropped token. All identifier
//! text is stored verbatim (quoted identifiers keep their delimiters),
//! which is what lets the printer preserve original casing in identifier
//! position while uppercasing keywords around it.

use crate::sql::Keyword;

/// One identifier segment: plain (original casing) or quoted
/// (delimiters kept).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Ident {
    #[display("{_0}")]
    Plain(String),
    #[display("{_0}")]
    Quoted(String),
}

/// Possibly-qualified name: `a`, `db.t`, including quoted segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub parts: Vec<Ident>,
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// A complete query statement: optional CTE bindings plus a chain of
/// set-operation operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Comments that preceded the statement; re-emitted above it.
    pub leading_comments: Vec<String>,
    pub with: Option<With>,
    pub body: QueryBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub bindings: Vec<CteBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CteBinding {
    pub name: Ident,
    pub query: Box<Query>,
}

/// First operand plus any number of `UNION`/`INTERSECT`/`EXCEPT` arms.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBody {
    pub first: Select,
    pub ops: Vec<(SetOp, Select)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SetOp {
    #[display("UNION")]
    Union,
    #[display("UNION ALL")]
    UnionAll,
    #[display("INTERSECT")]
    Intersect,
    #[display("INTERSECT ALL")]
    IntersectAll,
    #[display("EXCEPT")]
    Except,
    #[display("EXCEPT ALL")]
    ExceptAll,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    /// Query hint comment (`/*+ broadcast(t) */`) kept inline after SELECT.
    pub hint: Option<String>,
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Option<FromClause>,
    pub where_clause: Option<CondList>,
    pub group_by: Vec<Expr>,
    pub having: Option<CondList>,
    pub order_by: Vec<OrderItem>,
    pub cluster_by: Vec<Expr>,
    pub distribute_by: Vec<Expr>,
    pub sort_by: Vec<OrderItem>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    /// Rendered with an explicit `AS` even when the source omitted it.
    pub alias: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    /// Comma-separated sources; joins chain off the last one.
    pub tables: Vec<TableSource>,
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Table {
        name: Name,
        /// Rendered without `AS` even when the source included it.
        alias: Option<Ident>,
    },
    Derived {
        query: Box<Query>,
        alias: Option<Ident>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub source: TableSource,
    pub on: Option<CondList>,
    pub using: Vec<Ident>,
}

/// Join variants in canonical form (`INNER` and `OUTER` normalize away).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum JoinKind {
    #[display("JOIN")]
    Inner,
    #[display("LEFT JOIN")]
    Left,
    #[display("RIGHT JOIN")]
    Right,
    #[display("FULL JOIN")]
    Full,
    #[display("CROSS JOIN")]
    Cross,
    #[display("LEFT SEMI JOIN")]
    Semi,
    #[display("LEFT ANTI JOIN")]
    Anti,
}

/// Conditions of a WHERE/HAVING/ON clause, kept as a flat list so the
/// printer can lay each one on its own line with a leading connector.
#[derive(Debug, Clone, PartialEq)]
pub struct CondList {
    pub first: Expr,
    pub rest: Vec<(BoolConnector, Expr)>,
}

impl CondList {
    pub fn is_single(&self) -> bool {
        self.rest.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoolConnector {
    #[display("AND")]
    And,
    #[display("OR")]
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum OrderDirection {
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum NullsOrder {
    #[display("NULLS FIRST")]
    First,
    #[display("NULLS LAST")]
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Name),
    Star,
    /// `t.*`
    QualifiedStar(Name),
    Number(String),
    /// Quotes included; also covers `X'1F2A'`.
    StringLit(String),
    Bool(bool),
    Null,
    /// `DATE '2024-01-01'`, `TIMESTAMP '...'`, `INTERVAL '7' DAY`.
    TypedLit {
        type_kw: Keyword,
        value: String,
        unit: Option<String>,
    },
    Call(FunctionCall),
    /// `-x`, `+x`, `~x`, `!x`
    Unary {
        op: &'static str,
        operand: Box<Expr>,
    },
    Not(Box<Expr>),
    Binary {
        left: Box<Expr>,
        /// Operator text; word operators (`AND`, `OR`) render spaced,
        /// symbols render tight.
        op: &'static str,
        right: Box<Expr>,
    },
    Is {
        expr: Box<Expr>,
        negated: bool,
        value: IsValue,
    },
    InList {
        expr: Box<Expr>,
        negated: bool,
        items: Vec<Expr>,
    },
    InSubquery {
        expr: Box<Expr>,
        negated: bool,
        query: Box<Query>,
    },
    Between {
        expr: Box<Expr>,
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    Like {
        expr: Box<Expr>,
        negated: bool,
        keyword: Keyword,
        pattern: Box<Expr>,
    },
    Exists(Box<Query>),
    /// Scalar subquery `(SELECT ...)`.
    Subquery(Box<Query>),
    Case {
        operand: Option<Box<Expr>>,
        branches: Vec<CaseBranch>,
        else_result: Option<Box<Expr>>,
    },
    /// `expr::type`
    Cast {
        expr: Box<Expr>,
        target: TypeName,
    },
    /// `CAST(expr AS type)`
    CastCall {
        expr: Box<Expr>,
        target: TypeName,
    },
    /// `arr[0]`
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Callee name, rendered verbatim (function-name position is never
    /// keyword-uppercased).
    pub name: Name,
    pub distinct: bool,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub condition: Expr,
    pub result: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IsValue {
    #[display("NULL")]
    Null,
    #[display("TRUE")]
    True,
    #[display("FALSE")]
    False,
}

/// Data type reference, including nested generic parameters
/// (`MAP<STRING,ARRAY<INT>>`) and parenthesized arguments
/// (`DECIMAL(10,2)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    pub params: Vec<TypeParam>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeParam {
    Type(TypeName),
    /// `STRUCT<a:INT>` field; the field name keeps identifier casing.
    Field { name: Ident, ty: TypeName },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_display_joins_segments() {
        let name = Name {
            parts: vec![
                Ident::Plain("db".into()),
                Ident::Quoted("`My Table`".into()),
            ],
        };
        assert_eq!(name.to_string(), "db.`My Table`");
    }

    #[test]
    fn join_kind_rendering() {
        assert_eq!(JoinKind::Inner.to_string(), "JOIN");
        assert_eq!(JoinKind::Left.to_string(), "LEFT JOIN");
        assert_eq!(JoinKind::Anti.to_string(), "LEFT ANTI JOIN");
    }

    #[test]
    fn set_op_rendering() {
        assert_eq!(SetOp::Union.to_string(), "UNION");
        assert_eq!(SetOp::UnionAll.to_string(), "UNION ALL");
    }
}
