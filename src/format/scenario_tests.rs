#![cfg(test)]
//! End-to-end scenarios for the `format` entry point: canonical layout,
//! idempotence, fallback safety, and casing preservation.

use crate::format::{format, needs_format};
use rstest::rstest;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn canonical_clause_layout() {
    let input = "select a,b,count(*) c from t where x=1 and y=2 group by a,b having count(*)>1 order by a limit 10";
    let expected = "SELECT\n     a\n    ,b\n    ,count(*) AS c\nFROM t\nWHERE\n    x=1\n    AND y=2\nGROUP BY\n     a\n    ,b\nHAVING count(*)>1\nORDER BY\n     a\nLIMIT 10";
    assert_eq!(format(input), expected);
}

#[test]
fn no_spurious_break_before_closing_parenthesis() {
    assert_eq!(
        format("select * from t where exists (select 1)"),
        "SELECT * FROM t WHERE EXISTS (SELECT 1)"
    );
}

#[test]
fn unary_operators_bind_tight() {
    assert_eq!(
        format("select -x, +y from t"),
        "SELECT\n     -x\n    ,+y\nFROM t"
    );
}

#[test]
fn single_cte_renders_inline() {
    assert_eq!(
        format("with a as (select 1) select * from a"),
        "WITH a AS (SELECT 1) SELECT * FROM a"
    );
}

#[rstest]
#[case("select a, b bogus syntax here from t")]
#[case("merge into t using s on t.id = s.id")]
#[case("select * from t pivot (sum(x) for y in (1,2))")]
#[case("select 'unterminated from t")]
#[case("select ? from t")]
fn unsupported_input_returns_unchanged(#[case] sql: &str) {
    init_tracing();
    assert_eq!(format(sql), sql, "fallback must be byte-for-byte");
}

#[rstest]
#[case("select a,b,count(*) c from t where x=1 and y=2 group by a,b having count(*)>1 order by a limit 10")]
#[case("select * from t where exists (select 1)")]
#[case("with a as (select 1) select * from a")]
#[case("select distinct a, b from t1 join t2 on t1.id=t2.id left join t3 on t2.id=t3.id")]
#[case("select a <=> b, c::int, d->e, func(f => 1), g || h from t")]
#[case("select case when a=1 then 'x' else 'y' end k from t where a in (select a from u) order by k desc nulls last")]
#[case("select 1; select 2;")]
#[case("select a - -1, - -2 from t")]
#[case("-- leading\nselect /*+ repartition(4) */ a from t")]
#[case("select a::map<string,array<int>> x from t cluster by a")]
fn format_is_idempotent(#[case] sql: &str) {
    let once = format(sql);
    let twice = format(&once);
    assert_eq!(once, twice, "format must be a fixed point on its output");
}

#[test]
fn keyword_spelled_identifiers_keep_their_casing() {
    assert_eq!(
        format("select Order, `From` from t"),
        "SELECT\n     Order\n    ,`From`\nFROM t"
    );
}

#[test]
fn identifier_casing_survives_everywhere() {
    assert_eq!(
        format("select MyCol from MySchema.MyTable"),
        "SELECT MyCol FROM MySchema.MyTable"
    );
}

#[test]
fn function_names_render_verbatim() {
    assert_eq!(
        format("select COUNT(*), UPPER(name) n from t"),
        "SELECT\n     COUNT(*)\n    ,UPPER(name) AS n\nFROM t"
    );
}

#[rstest]
#[case("select a <=> b from t", "<=>")]
#[case("select a::int from t", "::")]
#[case("select a->b from t", "->")]
#[case("select func(a => 1) from t", "=>")]
#[case("select a || b from t", "||")]
#[case("select a |> b from t", "|>")]
#[case("select a << 1, b >> 2, c >>> 3 from t", ">>>")]
fn spark_operators_survive_formatting(#[case] sql: &str, #[case] op: &str) {
    assert!(format(sql).contains(op), "{op} should survive");
}

#[rstest]
#[case("100L")]
#[case("50S")]
#[case("10Y")]
#[case("3.14F")]
#[case("2.718D")]
#[case("99.99BD")]
#[case("1.5e10")]
#[case("2E-5")]
#[case("3.14e+2")]
#[case("0x1F")]
#[case("0b1010")]
fn numeric_literal_forms_survive_formatting(#[case] literal: &str) {
    let sql = format!("select {literal} from t");
    assert!(
        format(&sql).contains(literal),
        "{literal} should survive as a single token"
    );
}

#[test]
fn hex_binary_literal_survives() {
    assert!(format("select X'1F2A' from t").contains("X'1F2A'"));
}

#[rstest]
#[case("select * from t cluster by a")]
#[case("select * from t distribute by a")]
#[case("select * from t distribute by a sort by b desc")]
#[case("select * from t sort by a")]
fn spark_by_clauses_are_supported(#[case] sql: &str) {
    assert!(needs_format(sql).is_ok(), "should parse: {sql}");
}

#[test]
fn normalized_output_is_whitespace_insensitive() {
    let sparse = "select   a  ,  b   from    t   where  x  =  1";
    let dense = "select a,b from t where x=1";
    assert_eq!(format(sparse), format(dense));
}

#[test]
fn interior_comments_are_dropped_leading_ones_kept() {
    assert_eq!(
        format("-- cols\nselect a , b -- trailing\nfrom t"),
        "-- cols\nSELECT\n     a\n    ,b\nFROM t"
    );
}

#[test]
fn statement_sequence_keeps_separator_and_trailing_semicolon() {
    assert_eq!(
        format("select 1 ; ;select a,b from t;"),
        "SELECT 1;\nSELECT\n     a\n    ,b\nFROM t;"
    );
}
