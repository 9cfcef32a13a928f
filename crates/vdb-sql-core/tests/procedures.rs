//! Integration tests for the virtual procedure language.

mod common;

use common::{assert_canonical, parse, parse_err, round_trip};
use vdb_sql_core::ast::{
    AssignmentValue, Command, Criteria, Expression, SelectorType, Statement,
};
use vdb_sql_core::{parse_block, parse_criteria_selector, parse_statement, ParseInfo};

const VIRTUAL_PROCEDURE: &str = "CREATE VIRTUAL PROCEDURE BEGIN DECLARE integer x = 0; \
     IF (HAS CRITERIA ON (vm1.g1.e1)) BEGIN SELECT * FROM pm1.g1 WHERE TRANSLATE = CRITERIA \
     ON (vm1.g1.e1) WITH (vm1.g1.e1 = pm1.g1.e1); END ELSE BEGIN x = x + 1; END END";

#[test]
fn test_virtual_procedure_with_has_and_translate() {
    assert_canonical(
        VIRTUAL_PROCEDURE,
        "CREATE VIRTUAL PROCEDURE\n\
         BEGIN\n\
         DECLARE integer x = 0;\n\
         IF(HAS CRITERIA ON (vm1.g1.e1))\n\
         BEGIN\n\
         SELECT * FROM pm1.g1 WHERE TRANSLATE = CRITERIA ON (vm1.g1.e1) WITH (vm1.g1.e1 = pm1.g1.e1);\n\
         END\n\
         ELSE\n\
         BEGIN\n\
         x = (x + 1);\n\
         END\n\
         END",
    );

    let Command::UpdateProcedure(procedure) = parse(VIRTUAL_PROCEDURE) else {
        panic!("Expected procedure");
    };
    assert!(!procedure.update_procedure);
    let Statement::If(statement) = &procedure.block.statements[1] else {
        panic!("Expected IF");
    };
    let Criteria::Has(has) = &statement.condition else {
        panic!("Expected HAS criteria");
    };
    assert_eq!(has.selector.selector_type, SelectorType::Any);
    assert_eq!(has.selector.elements[0].name, "vm1.g1.e1");
}

#[test]
fn test_update_procedure_with_loops() {
    let sql = "CREATE PROCEDURE BEGIN \
               DECLARE string v; \
               LOOP ON (SELECT e1 FROM pm1.g1) AS c BEGIN \
                 IF (c.e1 = 'stop') BREAK; \
                 v = c.e1; \
               END \
               WHILE (v IS NOT NULL) BEGIN v = NULL; CONTINUE; END \
               EXEC proc1(v); \
               ERROR 'failed: ' || v; \
             END";
    let canonical = round_trip(sql);
    assert!(canonical.starts_with("CREATE PROCEDURE\nBEGIN\nDECLARE string v;\n"));
    assert!(canonical.contains("LOOP ON (SELECT e1 FROM pm1.g1) AS c\nBEGIN\nIF(c.e1 = 'stop')\nBEGIN\nBREAK;\nEND\n"));
    assert!(canonical.contains("ERROR ('failed: ' || v);\nEND"));
}

#[test]
fn test_empty_procedure() {
    assert_canonical("CREATE PROCEDURE BEGIN END", "CREATE PROCEDURE\nBEGIN\nEND");
}

#[test]
fn test_assignment_from_command() {
    let statement = parse_statement("x = SELECT e1 FROM g WHERE e2 = 1;", &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    let Statement::Assignment(assignment) = &statement else {
        panic!("Expected assignment");
    };
    assert!(matches!(assignment.value, AssignmentValue::Command(_)));
    assert_eq!(statement.to_string(), "x = SELECT e1 FROM g WHERE e2 = 1;");
}

#[test]
fn test_assignment_from_nested_set_query() {
    let canonical = round_trip(
        "CREATE VIRTUAL PROCEDURE BEGIN \
         x = SELECT a FROM g UNION SELECT b FROM h UNION SELECT c FROM i; \
         DECLARE string y = SELECT a FROM g UNION SELECT b FROM h UNION SELECT c FROM i; END",
    );
    assert!(
        canonical.contains("\nx = (SELECT a FROM g UNION SELECT b FROM h) UNION SELECT c FROM i;\n"),
        "{canonical}"
    );
    assert!(
        canonical.contains(
            "\nDECLARE string y = (SELECT a FROM g UNION SELECT b FROM h) UNION SELECT c FROM i;\n"
        ),
        "{canonical}"
    );
}

#[test]
fn test_assignment_parenthesized_query_forms() {
    let statement = parse_statement("x = (SELECT a FROM g);", &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    let Statement::Assignment(assignment) = &statement else {
        panic!("Expected assignment");
    };
    assert!(matches!(
        assignment.value,
        AssignmentValue::Expression(Expression::ScalarSubquery(_))
    ));
    assert_eq!(statement.to_string(), "x = (SELECT a FROM g);");

    let sql = "x = (SELECT a FROM g ORDER BY a LIMIT 1) UNION SELECT b FROM h;";
    let statement = parse_statement(sql, &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    let Statement::Assignment(assignment) = &statement else {
        panic!("Expected assignment");
    };
    let AssignmentValue::Command(command) = &assignment.value else {
        panic!("Expected command value");
    };
    assert!(matches!(command.as_ref(), Command::SetQuery(_)));
    assert_eq!(statement.to_string(), sql);

    let reparsed = parse_statement(statement.to_string().as_str(), &ParseInfo::default());
    assert_eq!(reparsed, Ok(statement));
}

#[test]
fn test_block_entry_point() {
    let block = parse_block("BEGIN INSERT INTO #t VALUES (1); DROP TABLE #t; END", &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    assert_eq!(block.statements.len(), 2);
    assert_eq!(
        block.to_string(),
        "BEGIN\nINSERT INTO #t VALUES (1);\nDROP TABLE #t;\nEND"
    );
}

#[test]
fn test_selector_entry_point() {
    let selector = parse_criteria_selector("IS NULL CRITERIA ON (e1, e2)", &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    assert_eq!(selector.selector_type, SelectorType::IsNull);
    assert_eq!(selector.to_string(), "IS NULL CRITERIA ON (e1, e2)");

    let selector = parse_criteria_selector("LIKE CRITERIA", &ParseInfo::default())
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    assert_eq!(selector.selector_type, SelectorType::Like);
}

#[test]
fn test_double_quoted_variables() {
    let err = parse_err("CREATE PROCEDURE BEGIN DECLARE integer \"x\"; END");
    assert!(err.message.contains("must not be double-quoted"), "{err}");

    let info = ParseInfo::default().with_allow_double_quoted_variable(true);
    let statement = parse_statement("DECLARE integer \"x\";", &info)
        .unwrap_or_else(|e| panic!("Failed to parse: {e}"));
    assert_eq!(statement.to_string(), "DECLARE integer x;");
}

#[test]
fn test_missing_end() {
    let err = parse_err("CREATE PROCEDURE BEGIN BREAK;");
    assert!(err.message.contains("END"), "{err}");
}

#[test]
fn test_statement_requires_semicolon() {
    assert!(parse_statement("BREAK", &ParseInfo::default()).is_err());
    assert!(parse_statement("DELETE FROM g", &ParseInfo::default()).is_err());
}
