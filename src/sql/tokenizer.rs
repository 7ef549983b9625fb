use crate::error::{Error, Result};
use crate::sql::{keyword::Keyword, token::Token, token_kind::TokenKind};

/// Spark SQL tokenizer producing a flat stream of `Token`s.
///
/// Behavior:
/// - Single left-to-right pass, no backtracking.
/// - Skips ASCII whitespace; everything else becomes exactly one token,
///   so the token spans partition the input (whitespace lives in the
///   gaps between spans).
/// - Longest-match-first for compound operators: `<=>` wins over `<=`
///   wins over `<`.
/// - Numeric literals are scanned whole: `1.5e10`, `0x1F`, `0b1010`,
///   `100L`, `99.99BD` are each one token; an exponent or type suffix is
///   never split off into an identifier.
/// - `--` always begins a line comment running to end of line. Two
///   adjacent minus operators must be separated by whitespace (`1 - -2`).
/// - `/* ... */` block comments may span lines; `/*+ ... */` hints are
///   ordinary block comments here.
/// - Words are classified once against the keyword table via a single
///   lowercased copy; original casing survives in the token span.
///
/// Failure:
/// - `Error::Lex` for a genuinely unrecognized character.
/// - `Error::Unterminated` for an unterminated string literal, quoted
///   identifier, or block comment.
///
/// Complexity: O(n) time, O(t) space where `t` is the number of tokens.
pub fn tokenize(sql: &str) -> Result<Vec<Token>> {
    let bytes = sql.as_bytes();
    let mut out: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Line comment. `--` is always a comment start (Spark semantics),
        // never two minus operators.
        if b == b'-' && bytes.get(i + 1) == Some(&b'-') {
            let end = scan_line_comment(bytes, i);
            out.push(Token::new(
                TokenKind::LineComment(sql[start..end].to_string()),
                start,
                end,
            ));
            i = end;
            continue;
        }

        // Block comment, including `/*+ ... */` query hints.
        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            let end = scan_block_comment(bytes, i).ok_or(Error::Unterminated {
                construct: "block comment",
                offset: start,
            })?;
            out.push(Token::new(
                TokenKind::BlockComment(sql[start..end].to_string()),
                start,
                end,
            ));
            i = end;
            continue;
        }

        // Words: keywords, identifiers, or the X'1F2A' hex-binary literal.
        if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 {
            if (b == b'x' || b == b'X') && bytes.get(i + 1) == Some(&b'\'') {
                let end = scan_quoted(bytes, i + 1).ok_or(Error::Unterminated {
                    construct: "string literal",
                    offset: start,
                })?;
                out.push(Token::new(
                    TokenKind::StringLit(sql[start..end].to_string()),
                    start,
                    end,
                ));
                i = end;
                continue;
            }
            let end = scan_word(bytes, i);
            let text = &sql[start..end];
            let kind = Keyword::from_lower(&text.to_ascii_lowercase())
                .map(TokenKind::Keyword)
                .unwrap_or_else(|| TokenKind::Ident(text.to_string()));
            out.push(Token::new(kind, start, end));
            i = end;
            continue;
        }

        // Numbers, including leading-dot decimals (`.5`) when the dot
        // cannot be a qualified-name separator.
        let leading_dot_number = b == b'.'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
            && !follows_name(&out);
        if b.is_ascii_digit() || leading_dot_number {
            let end = scan_number(bytes, i);
            out.push(Token::new(
                TokenKind::Number(sql[start..end].to_string()),
                start,
                end,
            ));
            i = end;
            continue;
        }

        // String literal.
        if b == b'\'' {
            let end = scan_quoted(bytes, i).ok_or(Error::Unterminated {
                construct: "string literal",
                offset: start,
            })?;
            out.push(Token::new(
                TokenKind::StringLit(sql[start..end].to_string()),
                start,
                end,
            ));
            i = end;
            continue;
        }

        // Quoted identifier, delimiters preserved verbatim.
        if b == b'`' || b == b'"' {
            let end = scan_quoted(bytes, i).ok_or(Error::Unterminated {
                construct: "quoted identifier",
                offset: start,
            })?;
            out.push(Token::new(
                TokenKind::QuotedIdent(sql[start..end].to_string()),
                start,
                end,
            ));
            i = end;
            continue;
        }

        // Operators and punctuation, longest match first.
        if let Some(symbol) = match_operator(&bytes[i..]) {
            let end = i + symbol.len();
            out.push(Token::new(TokenKind::Symbol(symbol), start, end));
            i = end;
            continue;
        }

        return Err(Error::Lex {
            character: sql[i..].chars().next().unwrap_or('\u{fffd}'),
            offset: i,
        });
    }

    Ok(out)
}

/// Word characters: alphanumeric, underscore, or non-ASCII (unicode
/// identifiers are accepted as-is).
fn scan_word(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 {
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Scan a number starting at `bytes[start]`. Handles hex (`0x...`),
/// binary (`0b...`), decimals with optional fraction and scientific
/// notation, and the Spark type suffixes `L`, `S`, `Y`, `F`, `D`, `BD`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();
    let mut i = start;

    if bytes[i] == b'0' && i + 1 < len {
        match bytes[i + 1] {
            b'x' | b'X' => {
                i += 2;
                while i < len && bytes[i].is_ascii_hexdigit() {
                    i += 1;
                }
                return i;
            }
            b'b' | b'B' if bytes.get(i + 2).is_some_and(|b| *b == b'0' || *b == b'1') => {
                i += 2;
                while i < len && (bytes[i] == b'0' || bytes[i] == b'1') {
                    i += 1;
                }
                return i;
            }
            _ => {}
        }
    }

    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }

    if i < len && bytes[i] == b'.' {
        i += 1;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }

    // Exponent only counts when followed by digits (with optional sign);
    // otherwise `1e` stays `1` + identifier `e`.
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < len && bytes[j].is_ascii_digit() {
            i = j;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    // Type suffix, only at a word boundary so `1DAY` stays `1` + `DAY`.
    if i < len {
        if i + 1 < len
            && (bytes[i] == b'b' || bytes[i] == b'B')
            && (bytes[i + 1] == b'd' || bytes[i + 1] == b'D')
            && !bytes.get(i + 2).is_some_and(|b| b.is_ascii_alphanumeric())
        {
            i += 2;
        } else {
            match bytes[i] {
                b'd' | b'D' | b'f' | b'F' | b'l' | b'L' | b's' | b'S' | b'y' | b'Y' => {
                    if !bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphanumeric()) {
                        i += 1;
                    }
                }
                _ => {}
            }
        }
    }

    i
}

/// Scan a delimited region starting at the delimiter `bytes[start]`.
/// Handles backslash escapes and doubled-delimiter escapes. Returns the
/// end offset past the closing delimiter, or `None` if unterminated.
fn scan_quoted(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if b == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return Some(i + 1);
        }
        i += 1;
    }
    None
}

/// End of a `--` comment: up to (not including) the newline.
fn scan_line_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

/// End of a `/* ... */` comment (past the closing delimiter), or `None`.
fn scan_block_comment(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// True when the previous token can be the left side of a qualified-name
/// dot, in which case `.5` is a dot then a number, not a decimal.
fn follows_name(out: &[Token]) -> bool {
    match out.last() {
        Some(t) => matches!(
            &t.kind,
            TokenKind::Ident(_)
                | TokenKind::QuotedIdent(_)
                | TokenKind::Number(_)
                | TokenKind::Symbol(")")
                | TokenKind::Symbol("]")
        ),
        None => false,
    }
}

const THREE_CHAR_OPS: [&str; 2] = ["<=>", ">>>"];
const TWO_CHAR_OPS: [&str; 12] = [
    "<<", ">>", "<>", "<=", ">=", "!=", "==", "->", "=>", "::", "||", "|>",
];

/// Longest-match operator / punctuation lookup at the head of `rest`.
fn match_operator(rest: &[u8]) -> Option<&'static str> {
    for op in THREE_CHAR_OPS {
        if rest.starts_with(op.as_bytes()) {
            return Some(op);
        }
    }
    for op in TWO_CHAR_OPS {
        if rest.starts_with(op.as_bytes()) {
            return Some(op);
        }
    }
    let symbol = match rest[0] {
        b'(' => "(",
        b')' => ")",
        b'[' => "[",
        b']' => "]",
        b',' => ",",
        b'.' => ".",
        b';' => ";",
        b'+' => "+",
        b'-' => "-",
        b'*' => "*",
        b'/' => "/",
        b'%' => "%",
        b'=' => "=",
        b'<' => "<",
        b'>' => ">",
        b'!' => "!",
        b'~' => "~",
        b'&' => "&",
        b'|' => "|",
        b'^' => "^",
        b':' => ":",
        _ => return None,
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Reassemble the input from token spans, checking that only
    /// whitespace lives between them.
    fn reconstruct(sql: &str) -> String {
        let tokens = tokenize(sql).expect("input should tokenize");
        let mut rebuilt = String::new();
        let mut prev_end = 0;
        for t in &tokens {
            let gap = &sql[prev_end..t.start];
            assert!(
                gap.chars().all(char::is_whitespace),
                "non-whitespace between tokens: {gap:?}"
            );
            rebuilt.push_str(gap);
            rebuilt.push_str(t.text(sql));
            prev_end = t.end;
        }
        rebuilt.push_str(&sql[prev_end..]);
        rebuilt
    }

    #[rstest]
    #[case("select a,b,count(*) c from t where x=1 and y=2 group by a,b")]
    #[case("SELECT `weird col`, \"other\" FROM t -- trailing\n")]
    #[case("select 1.5e10, 2E-5, 0x1F, 0b1010, 100L, 99.99BD from t")]
    #[case("select a <=> b, c::int, d->e, f || g, h |> i from t /* block\ncomment */")]
    #[case("select x'1F2A', 'it''s', 'esc\\'aped' from t")]
    fn tokens_partition_the_input(#[case] sql: &str) {
        assert_eq!(reconstruct(sql), sql);
    }

    #[test]
    fn basic_select_sequence() {
        let toks = tokenize("SELECT a, b FROM t").unwrap();
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::Select)));
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(toks.iter().any(|t| t.ident() == Some("a")));
        assert!(toks.iter().any(|t| t.ident() == Some("t")));
    }

    #[test]
    fn preserves_case_in_spans() {
        let sql = "From MyTable";
        let toks = tokenize(sql).unwrap();
        assert!(toks[0].is_keyword(Keyword::From));
        assert_eq!(toks[0].text(sql), "From");
        assert_eq!(toks[1].ident(), Some("MyTable"));
    }

    #[rstest]
    #[case("1", "1")]
    #[case("1.5", "1.5")]
    #[case(".5", ".5")]
    #[case("1.5e10", "1.5e10")]
    #[case("2E-5", "2E-5")]
    #[case("3.14e+2", "3.14e+2")]
    #[case("0x1F", "0x1F")]
    #[case("0b1010", "0b1010")]
    #[case("100L", "100L")]
    #[case("50S", "50S")]
    #[case("10Y", "10Y")]
    #[case("3.14F", "3.14F")]
    #[case("2.718D", "2.718D")]
    #[case("99.99BD", "99.99BD")]
    fn numbers_scan_as_single_tokens(#[case] sql: &str, #[case] expected: &str) {
        let toks = tokenize(sql).unwrap();
        assert_eq!(toks.len(), 1, "expected one token for {sql}: {toks:?}");
        assert_eq!(toks[0].kind, TokenKind::Number(expected.to_string()));
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        let toks = tokenize("1e").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Number("1".into()));
        assert_eq!(toks[1].kind, TokenKind::Ident("e".into()));
    }

    #[test]
    fn suffix_requires_word_boundary() {
        let toks = tokenize("1DAY").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Number("1".into()));
        assert_eq!(toks[1].kind, TokenKind::Ident("DAY".into()));
    }

    #[test]
    fn dot_after_name_is_punctuation_not_decimal() {
        let toks = tokenize("t.5").unwrap();
        assert_eq!(toks[1].kind, TokenKind::Symbol("."));
        let toks = tokenize("select .5").unwrap();
        assert_eq!(toks[1].kind, TokenKind::Number(".5".into()));
    }

    #[rstest]
    #[case("a<=>b", "<=>")]
    #[case("a>>>b", ">>>")]
    #[case("a<>b", "<>")]
    #[case("a<=b", "<=")]
    #[case("a>=b", ">=")]
    #[case("a!=b", "!=")]
    #[case("a->b", "->")]
    #[case("a=>b", "=>")]
    #[case("a::b", "::")]
    #[case("a||b", "||")]
    #[case("a|>b", "|>")]
    #[case("a<<b", "<<")]
    #[case("a>>b", ">>")]
    fn compound_operators_take_longest_match(#[case] sql: &str, #[case] op: &str) {
        let toks = tokenize(sql).unwrap();
        assert_eq!(toks.len(), 3, "{sql} should lex as three tokens: {toks:?}");
        assert!(toks[1].kind.is_symbol(op));
    }

    #[test]
    fn double_dash_is_always_a_comment() {
        let toks = tokenize("select 1--2\nfrom t").unwrap();
        assert_eq!(toks[2].kind, TokenKind::LineComment("--2".into()));
        assert!(toks[3].is_keyword(Keyword::From));
    }

    #[test]
    fn single_minus_is_an_operator() {
        let toks = tokenize("1 - -2").unwrap();
        assert!(toks[1].kind.is_symbol("-"));
        assert!(toks[2].kind.is_symbol("-"));
        assert_eq!(toks[3].kind, TokenKind::Number("2".into()));
    }

    #[test]
    fn block_comment_spans_lines() {
        let toks = tokenize("select /* a\nb */ 1").unwrap();
        assert_eq!(toks[1].kind, TokenKind::BlockComment("/* a\nb */".into()));
    }

    #[test]
    fn quoted_identifiers_keep_delimiters() {
        let sql = "select `my col`, \"Other\" from t";
        let toks = tokenize(sql).unwrap();
        assert_eq!(toks[1].kind, TokenKind::QuotedIdent("`my col`".into()));
        assert_eq!(toks[3].kind, TokenKind::QuotedIdent("\"Other\"".into()));
    }

    #[test]
    fn hex_binary_literal_is_one_token() {
        let toks = tokenize("X'1F2A'").unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::StringLit("X'1F2A'".into()));
    }

    #[test]
    fn doubled_quote_escape_inside_string() {
        let toks = tokenize("'it''s'").unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::StringLit("'it''s'".into()));
    }

    #[test]
    fn unrecognized_character_reports_offset() {
        let err = tokenize("select ?").unwrap_err();
        match err {
            Error::Lex { character, offset } => {
                assert_eq!(character, '?');
                assert_eq!(offset, 7);
            }
            other => panic!("expected Error::Lex, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_reports_offset() {
        let err = tokenize("select 'oops").unwrap_err();
        match err {
            Error::Unterminated { construct, offset } => {
                assert_eq!(construct, "string literal");
                assert_eq!(offset, 7);
            }
            other => panic!("expected Error::Unterminated, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(matches!(
            tokenize("select 1 /* open"),
            Err(Error::Unterminated {
                construct: "block comment",
                ..
            })
        ));
    }
}
