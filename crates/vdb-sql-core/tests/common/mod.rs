#![allow(dead_code)]

use vdb_sql_core::ast::{Criteria, Query};
use vdb_sql_core::{parse_command, Command, ParseInfo, QueryParserError};

pub fn parse(sql: &str) -> Command {
    parse_command(sql, &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> QueryParserError {
    parse_command(sql, &ParseInfo::default())
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_query(sql: &str) -> Query {
    match parse(sql) {
        Command::Query(q) => q,
        other => panic!("Expected query, got {other:?}"),
    }
}

pub fn parse_where(sql: &str) -> Criteria {
    parse_query(sql)
        .criteria
        .unwrap_or_else(|| panic!("Expected WHERE clause in: {sql}"))
}

/// Verifies that rendering is a fixed point: the canonical text parses to
/// an equal tree and renders to the same text again. Returns the canonical
/// text.
pub fn round_trip(sql: &str) -> String {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_string();
    assert_eq!(
        ast1, ast2,
        "Round-trip changed the tree.\n  Input:    {sql}\n  Rendered: {rendered1}"
    );
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    rendered1
}

/// Asserts the canonical rendering of `sql` and that it round-trips.
pub fn assert_canonical(sql: &str, expected: &str) {
    assert_eq!(round_trip(sql), expected, "Input: {sql}");
}
