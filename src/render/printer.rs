use itertools::Itertools as _;

use crate::parse::ast::*;

/// Canonical layout constants: continuation lines sit at `INDENT`, the
/// first item of a comma-first block sits one column deeper so it lines
/// up with the items behind the commas.
const INDENT: usize = 4;

/// Render a parsed statement in canonical layout. Pure and total: every
/// AST variant has a rendering rule, enforced by exhaustive matches.
pub fn print(query: &Query) -> String {
    let mut out = String::new();
    for comment in &query.leading_comments {
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str(&query_sql(query));
    out
}

/// A rendered clause: either a candidate for single-line layout or a
/// block that forces the whole query onto multiple lines.
enum Piece {
    Inline(String),
    Block(Vec<String>),
}

fn query_sql(query: &Query) -> String {
    let pieces = query_pieces(query);
    let all_inline = pieces
        .iter()
        .all(|p| matches!(p, Piece::Inline(text) if !text.contains('\n')));
    if all_inline {
        return pieces
            .into_iter()
            .filter_map(|p| match p {
                Piece::Inline(text) => Some(text),
                Piece::Block(_) => None,
            })
            .join(" ");
    }
    let mut lines = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Inline(text) => push_at(&mut lines, 0, &text),
            Piece::Block(block) => lines.extend(block),
        }
    }
    lines.join("\n")
}

fn query_pieces(query: &Query) -> Vec<Piece> {
    let mut pieces = Vec::new();
    if let Some(with) = &query.with {
        pieces.push(with_piece(with));
    }
    select_pieces(&query.body.first, &mut pieces);
    for (op, select) in &query.body.ops {
        pieces.push(Piece::Block(vec![op.to_string()]));
        select_pieces(select, &mut pieces);
    }
    pieces
}

fn with_piece(with: &With) -> Piece {
    if let [binding] = with.bindings.as_slice() {
        return Piece::Inline(format!(
            "WITH {} AS {}",
            binding.name,
            parenthesized_query(&binding.query)
        ));
    }
    let mut lines = Vec::new();
    for (i, binding) in with.bindings.iter().enumerate() {
        let body = parenthesized_query(&binding.query);
        if i == 0 {
            push_at(&mut lines, 0, &format!("WITH {} AS {body}", binding.name));
        } else {
            push_at(&mut lines, INDENT, &format!(",{} AS {body}", binding.name));
        }
    }
    Piece::Block(lines)
}

fn select_pieces(select: &Select, pieces: &mut Vec<Piece>) {
    let mut head = String::from("SELECT");
    if let Some(hint) = &select.hint {
        head.push(' ');
        head.push_str(hint);
    }
    if select.distinct {
        head.push_str(" DISTINCT");
    }
    let items: Vec<String> = select.items.iter().map(select_item_sql).collect();
    if let [item] = items.as_slice() {
        pieces.push(Piece::Inline(format!("{head} {item}")));
    } else {
        let mut lines = vec![head];
        comma_first(&mut lines, &items);
        pieces.push(Piece::Block(lines));
    }

    if let Some(from) = &select.from {
        from_pieces(from, pieces);
    }
    if let Some(cond) = &select.where_clause {
        pieces.push(cond_piece("WHERE", cond));
    }
    if !select.group_by.is_empty() {
        pieces.push(block_list("GROUP BY", &sql_list(&select.group_by)));
    }
    if let Some(cond) = &select.having {
        pieces.push(cond_piece("HAVING", cond));
    }
    if !select.order_by.is_empty() {
        let items: Vec<String> = select.order_by.iter().map(order_item_sql).collect();
        pieces.push(block_list("ORDER BY", &items));
    }
    if !select.cluster_by.is_empty() {
        pieces.push(block_list("CLUSTER BY", &sql_list(&select.cluster_by)));
    }
    if !select.distribute_by.is_empty() {
        pieces.push(block_list("DISTRIBUTE BY", &sql_list(&select.distribute_by)));
    }
    if !select.sort_by.is_empty() {
        let items: Vec<String> = select.sort_by.iter().map(order_item_sql).collect();
        pieces.push(block_list("SORT BY", &items));
    }
    if let Some(limit) = &select.limit {
        pieces.push(Piece::Inline(format!("LIMIT {}", expr_sql(limit))));
    }
    if let Some(offset) = &select.offset {
        pieces.push(Piece::Inline(format!("OFFSET {}", expr_sql(offset))));
    }
}

fn from_pieces(from: &FromClause, pieces: &mut Vec<Piece>) {
    let tables = from.tables.iter().map(table_source_sql).join(",");
    pieces.push(Piece::Inline(format!("FROM {tables}")));
    for join in &from.joins {
        let mut lines = Vec::new();
        let mut head = format!("{} {}", join.kind, table_source_sql(&join.source));
        if !join.using.is_empty() {
            let columns = join.using.iter().map(ToString::to_string).join(",");
            head.push_str(&format!(" USING ({columns})"));
        }
        push_at(&mut lines, 0, &head);
        if let Some(on) = &join.on {
            push_at(&mut lines, INDENT, &format!("ON {}", expr_sql(&on.first)));
            for (connector, expr) in &on.rest {
                push_at(
                    &mut lines,
                    INDENT,
                    &format!("{connector} {}", expr_sql(expr)),
                );
            }
        }
        pieces.push(Piece::Block(lines));
    }
}

fn cond_piece(keyword: &str, cond: &CondList) -> Piece {
    if cond.is_single() {
        return Piece::Inline(format!("{keyword} {}", expr_sql(&cond.first)));
    }
    let mut lines = vec![keyword.to_string()];
    push_at(&mut lines, INDENT, &expr_sql(&cond.first));
    for (connector, expr) in &cond.rest {
        push_at(
            &mut lines,
            INDENT,
            &format!("{connector} {}", expr_sql(expr)),
        );
    }
    Piece::Block(lines)
}

fn block_list(keyword: &str, items: &[String]) -> Piece {
    let mut lines = vec![keyword.to_string()];
    comma_first(&mut lines, items);
    Piece::Block(lines)
}

/// Comma-first layout: first item one column deeper than the commas.
fn comma_first(lines: &mut Vec<String>, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        if i == 0 {
            push_at(lines, INDENT + 1, item);
        } else {
            push_at(lines, INDENT, &format!(",{item}"));
        }
    }
}

/// Append `text` shifted right by `indent` columns, preserving its
/// internal relative indentation across embedded newlines.
fn push_at(lines: &mut Vec<String>, indent: usize, text: &str) {
    let pad = " ".repeat(indent);
    for line in text.split('\n') {
        lines.push(format!("{pad}{line}"));
    }
}

fn indent_by(indent: usize, text: &str) -> String {
    let pad = " ".repeat(indent);
    text.split('\n').map(|line| format!("{pad}{line}")).join("\n")
}

/// A subquery or CTE body inside parentheses: inline when its rendering
/// is a single line (`(SELECT 1)`, never `(SELECT 1\n)`), otherwise the
/// body opens after `(` and the closing parenthesis gets its own line.
fn parenthesized_query(query: &Query) -> String {
    let body = query_sql(query);
    if body.contains('\n') {
        format!("(\n{}\n)", indent_by(INDENT, &body))
    } else {
        format!("({body})")
    }
}

fn select_item_sql(item: &SelectItem) -> String {
    match &item.alias {
        Some(alias) => format!("{} AS {alias}", expr_sql(&item.expr)),
        None => expr_sql(&item.expr),
    }
}

fn table_source_sql(source: &TableSource) -> String {
    match source {
        TableSource::Table { name, alias } => match alias {
            Some(alias) => format!("{name} {alias}"),
            None => name.to_string(),
        },
        TableSource::Derived { query, alias } => {
            let body = parenthesized_query(query);
            match alias {
                Some(alias) => format!("{body} {alias}"),
                None => body,
            }
        }
    }
}

fn order_item_sql(item: &OrderItem) -> String {
    let mut out = expr_sql(&item.expr);
    if let Some(direction) = &item.direction {
        out.push(' ');
        out.push_str(&direction.to_string());
    }
    if let Some(nulls) = &item.nulls {
        out.push(' ');
        out.push_str(&nulls.to_string());
    }
    out
}

fn sql_list(exprs: &[Expr]) -> Vec<String> {
    exprs.iter().map(expr_sql).collect()
}

pub fn expr_sql(expr: &Expr) -> String {
    match expr {
        Expr::Column(name) => name.to_string(),
        Expr::Star => "*".to_string(),
        Expr::QualifiedStar(name) => format!("{name}.*"),
        Expr::Number(text) => text.clone(),
        Expr::StringLit(text) => text.clone(),
        Expr::Bool(true) => "TRUE".to_string(),
        Expr::Bool(false) => "FALSE".to_string(),
        Expr::Null => "NULL".to_string(),
        Expr::TypedLit {
            type_kw,
            value,
            unit,
        } => {
            let mut out = format!("{type_kw} {value}");
            if let Some(unit) = unit {
                out.push(' ');
                out.push_str(&unit.to_ascii_uppercase());
            }
            out
        }
        Expr::Call(call) => {
            let args = call.args.iter().map(expr_sql).join(",");
            let distinct = if call.distinct { "DISTINCT " } else { "" };
            format!("{}({distinct}{args})", call.name)
        }
        Expr::Unary { op, operand } => {
            let operand_sql = expr_sql(operand);
            // `- -1` must not fuse into a `--` comment marker.
            if *op == "-" && operand_sql.starts_with('-') {
                format!("- {operand_sql}")
            } else {
                format!("{op}{operand_sql}")
            }
        }
        Expr::Not(inner) => format!("NOT {}", expr_sql(inner)),
        Expr::Binary { left, op, right } => binary_sql(left, op, right),
        Expr::Is {
            expr,
            negated,
            value,
        } => {
            let not = if *negated { " NOT" } else { "" };
            format!("{} IS{not} {value}", expr_sql(expr))
        }
        Expr::InList {
            expr,
            negated,
            items,
        } => {
            let not = if *negated { " NOT" } else { "" };
            let list = items.iter().map(expr_sql).join(",");
            format!("{}{not} IN ({list})", expr_sql(expr))
        }
        Expr::InSubquery {
            expr,
            negated,
            query,
        } => {
            let not = if *negated { " NOT" } else { "" };
            format!("{}{not} IN {}", expr_sql(expr), parenthesized_query(query))
        }
        Expr::Between {
            expr,
            negated,
            low,
            high,
        } => {
            let not = if *negated { " NOT" } else { "" };
            format!(
                "{}{not} BETWEEN {} AND {}",
                expr_sql(expr),
                expr_sql(low),
                expr_sql(high)
            )
        }
        Expr::Like {
            expr,
            negated,
            keyword,
            pattern,
        } => {
            let not = if *negated { " NOT" } else { "" };
            format!("{}{not} {keyword} {}", expr_sql(expr), expr_sql(pattern))
        }
        Expr::Exists(query) => format!("EXISTS {}", parenthesized_query(query)),
        Expr::Subquery(query) => parenthesized_query(query),
        Expr::Case {
            operand,
            branches,
            else_result,
        } => {
            let mut out = String::from("CASE");
            if let Some(operand) = operand {
                out.push(' ');
                out.push_str(&expr_sql(operand));
            }
            for branch in branches {
                out.push_str(&format!(
                    " WHEN {} THEN {}",
                    expr_sql(&branch.condition),
                    expr_sql(&branch.result)
                ));
            }
            if let Some(else_result) = else_result {
                out.push_str(&format!(" ELSE {}", expr_sql(else_result)));
            }
            out.push_str(" END");
            out
        }
        Expr::Cast { expr, target } => format!("{}::{}", expr_sql(expr), type_sql(target)),
        Expr::CastCall { expr, target } => {
            format!("CAST({} AS {})", expr_sql(expr), type_sql(target))
        }
        Expr::Subscript { base, index } => format!("{}[{}]", expr_sql(base), expr_sql(index)),
        Expr::Paren(inner) => format!("({})", expr_sql(inner)),
    }
}

/// Word operators render spaced, symbols render tight; a tight minus
/// before a negative operand keeps one space so `--` never appears.
fn binary_sql(left: &Expr, op: &str, right: &Expr) -> String {
    let left_sql = expr_sql(left);
    let right_sql = expr_sql(right);
    if op.starts_with(|c: char| c.is_ascii_alphabetic()) {
        format!("{left_sql} {op} {right_sql}")
    } else if op.ends_with('-') && right_sql.starts_with('-') {
        format!("{left_sql}{op} {right_sql}")
    } else {
        format!("{left_sql}{op}{right_sql}")
    }
}

fn type_sql(ty: &TypeName) -> String {
    let mut out = ty.name.to_ascii_uppercase();
    if !ty.params.is_empty() {
        out.push('<');
        out.push_str(&ty.params.iter().map(type_param_sql).join(","));
        out.push('>');
    }
    if !ty.args.is_empty() {
        out.push('(');
        out.push_str(&ty.args.iter().join(","));
        out.push(')');
    }
    out
}

fn type_param_sql(param: &TypeParam) -> String {
    match param {
        TypeParam::Type(ty) => type_sql(ty),
        TypeParam::Field { name, ty } => format!("{name}:{}", type_sql(ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_statement;
    use crate::sql::tokenize;
    use rstest::rstest;

    fn render(sql: &str) -> String {
        let tokens = tokenize(sql).expect("test input should tokenize");
        let query = parse_statement(sql, &tokens).expect("test input should parse");
        print(&query)
    }

    #[rstest]
    #[case("select a from t where x = 1", "SELECT a FROM t WHERE x=1")]
    #[case("select -x from t", "SELECT -x FROM t")]
    #[case("select a - -1 from t", "SELECT a- -1 FROM t")]
    #[case("select func( a , b , c ) from t", "SELECT func(a,b,c) FROM t")]
    #[case("select count ( * ) from t", "SELECT count(*) FROM t")]
    #[case(
        "select count(distinct x) from t",
        "SELECT count(DISTINCT x) FROM t"
    )]
    #[case("select a || b from t", "SELECT a||b FROM t")]
    #[case("select a <=> b from t", "SELECT a<=>b FROM t")]
    #[case("select arr [ 0 ] from t", "SELECT arr[0] FROM t")]
    #[case("select a :: int from t", "SELECT a::INT FROM t")]
    #[case(
        "select cast(a as decimal(10,2)) from t",
        "SELECT CAST(a AS DECIMAL(10,2)) FROM t"
    )]
    #[case(
        "select a::struct<a:int,b:string> from t",
        "SELECT a::STRUCT<a:INT,b:STRING> FROM t"
    )]
    #[case("select not a from t", "SELECT NOT a FROM t")]
    #[case("select a is not null from t", "SELECT a IS NOT NULL FROM t")]
    #[case("select date '2024-01-01' from t", "SELECT DATE '2024-01-01' FROM t")]
    #[case(
        "select interval '7' day from t",
        "SELECT INTERVAL '7' DAY FROM t"
    )]
    #[case(
        "select case when a=1 then 'x' else 'y' end from t",
        "SELECT CASE WHEN a=1 THEN 'x' ELSE 'y' END FROM t"
    )]
    #[case("select ( a + b ) * c from t", "SELECT (a+b)*c FROM t")]
    fn expression_rendering(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[test]
    fn multi_item_select_uses_comma_first_block() {
        assert_eq!(
            render("select a, b from t"),
            "SELECT\n     a\n    ,b\nFROM t"
        );
    }

    #[test]
    fn single_item_by_clause_still_breaks() {
        assert_eq!(
            render("select a from t order by a"),
            "SELECT a\nFROM t\nORDER BY\n     a"
        );
    }

    #[test]
    fn join_sits_at_column_zero_with_on_indented() {
        assert_eq!(
            render("select * from t join u on t.a=u.a and t.b=u.b"),
            "SELECT *\nFROM t\nJOIN u\n    ON t.a=u.a\n    AND t.b=u.b"
        );
    }

    #[test]
    fn table_alias_drops_as_keyword() {
        assert_eq!(render("select * from t as x"), "SELECT * FROM t x");
    }

    #[test]
    fn column_alias_gains_as_keyword() {
        assert_eq!(render("select a b from t"), "SELECT a AS b FROM t");
    }

    #[test]
    fn subquery_with_block_body_closes_on_own_line() {
        assert_eq!(
            render("select * from (select a, b from t) x"),
            "SELECT *\nFROM (\n    SELECT\n         a\n        ,b\n    FROM t\n) x"
        );
    }

    #[test]
    fn set_operation_keyword_gets_its_own_line() {
        assert_eq!(
            render("select 1 union all select 2"),
            "SELECT 1\nUNION ALL\nSELECT 2"
        );
    }

    #[test]
    fn multiple_cte_bindings_are_comma_first() {
        assert_eq!(
            render("with a as (select 1), b as (select 2) select * from a"),
            "WITH a AS (SELECT 1)\n    ,b AS (SELECT 2)\nSELECT *\nFROM a"
        );
    }

    #[test]
    fn hint_stays_inline_after_select() {
        assert_eq!(
            render("select /*+ broadcast(t) */ a from t"),
            "SELECT /*+ broadcast(t) */ a FROM t"
        );
    }

    #[test]
    fn leading_comments_are_emitted_above() {
        assert_eq!(render("-- note\nselect 1"), "-- note\nSELECT 1");
    }
}
