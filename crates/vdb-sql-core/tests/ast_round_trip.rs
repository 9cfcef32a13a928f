//! Hand-built trees must survive `parse(unparse(tree)) == tree`.

mod common;

use chrono::{NaiveDate, NaiveTime};
use common::parse;
use vdb_sql_core::ast::{
    AggregateFunction, AssignmentStatement, AssignmentValue, BetweenCriteria, Block,
    CaseExpression, ColumnDefinition, Command, CompareOperator, Create,
    CreateUpdateProcedureCommand, Criteria, CriteriaSelector, DataType, DeclareStatement, Delete,
    Drop, DynamicCommand, ElementSymbol, Expression, FromClause, GroupSymbol, HasCriteria,
    IfStatement, Insert, InsertSource, IsNullCriteria, JoinType, Limit, LoopStatement,
    MatchCriteria, OrderBy, OrderByItem, ParameterDirection, Quantifier, Query, QueryOption,
    SearchedCaseExpression, Select, SelectorType, SetClause, SetCriteria, SetOperation, SetQuery,
    SpParameter, Statement, StoredProcedure, SubqueryCompareCriteria, SubqueryFromClause,
    SubquerySetCriteria, TranslateCriteria, Update, UpdateCount, Value, WhileStatement, XQuery,
};
use vdb_sql_core::to_canonical_string;

fn assert_round_trip(command: &Command) {
    let text = to_canonical_string(command);
    let reparsed = parse(&text);
    assert_eq!(&reparsed, command, "Canonical text: {text}");
}

fn element(name: &str) -> Expression {
    Expression::element(name)
}

fn simple_select(column: &str, group: &str) -> Command {
    Command::select(vec![element(column)], vec![FromClause::group(group)])
}

#[test]
fn test_query_with_every_clause() {
    let command = Command::Query(Query {
        select: Select {
            distinct: true,
            symbols: vec![
                element("pm1.g1.e1"),
                Expression::binary("+", element("e2"), Expression::integer(1)).named("expr"),
                Expression::aggregate(AggregateFunction::Count, false, None),
                Expression::string("x").named("expr1").alias("label"),
                Expression::aggregate(AggregateFunction::Sum, true, Some(element("e3")))
                    .alias("total"),
            ],
        },
        into: None,
        from: vec![FromClause::aliased("pm1.g1", "a").join(
            JoinType::LeftOuter,
            FromClause::group("pm1.g2"),
            vec![Criteria::eq(element("a.e1"), element("pm1.g2.e1"))],
        )],
        criteria: Some(Criteria::and(vec![
            Criteria::compare(element("e2"), CompareOperator::Gt, Expression::Reference(0)),
            Criteria::IsNull(IsNullCriteria {
                expression: element("e3"),
                negated: false,
            }),
        ])),
        group_by: vec![element("pm1.g1.e1"), element("e2")],
        having: Some(Criteria::compare(
            Expression::aggregate(AggregateFunction::Count, false, None),
            CompareOperator::Gt,
            Expression::integer(1),
        )),
        order_by: Some(OrderBy {
            items: vec![OrderByItem {
                expression: element("e2"),
                ascending: false,
            }],
        }),
        limit: Some(Limit {
            offset: Some(Expression::Reference(1)),
            row_limit: Expression::integer(10),
        }),
        option: Some(QueryOption {
            show_plan: true,
            no_cache: true,
            no_cache_groups: vec!["pm1.g1".into()],
            ..QueryOption::default()
        }),
    });
    assert_round_trip(&command);
}

#[test]
fn test_every_constant() {
    let constants = vec![
        Value::Null,
        Value::String("it's".into()),
        Value::Integer(-7),
        Value::Long(10_000_000_000),
        Value::Long(-10_000_000_000),
        Value::BigInteger("123456789012345678901234567890".into()),
        Value::BigInteger("-123456789012345678901234567890".into()),
        Value::Double(2.5),
        Value::Double(-0.125),
        Value::Double(1e300),
        Value::Boolean(false),
        Value::Date(NaiveDate::from_ymd_opt(2002, 10, 2).expect("valid date")),
        Value::Time(NaiveTime::from_hms_opt(11, 10, 0).expect("valid time")),
        Value::Timestamp(
            NaiveDate::from_ymd_opt(2002, 10, 2)
                .and_then(|d| d.and_hms_nano_opt(11, 10, 0, 120_000_000))
                .expect("valid timestamp"),
        ),
    ];
    let symbols = constants
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let name = if i == 0 { "expr".to_string() } else { format!("expr{i}") };
            Expression::Constant(value).named(name)
        })
        .collect();
    assert_round_trip(&Command::select(symbols, vec![FromClause::group("g")]));
}

#[test]
fn test_expression_forms() {
    let symbols = vec![
        Expression::function("concat", vec![element("e1"), Expression::string("x")]).named("expr"),
        Expression::function("cast", vec![element("e2"), Expression::string("biginteger")])
            .named("expr1"),
        Expression::function("convert", vec![element("e3"), Expression::string("timestamp")])
            .named("expr2"),
        Expression::function("left", vec![element("e1"), Expression::integer(2)]).named("expr3"),
        Expression::Case(CaseExpression {
            operand: Box::new(element("e1")),
            whens: vec![Expression::integer(1), Expression::integer(2)],
            thens: vec![Expression::string("a"), Expression::string("b")],
            else_expr: Some(Box::new(Expression::null())),
        })
        .named("expr4"),
        Expression::SearchedCase(SearchedCaseExpression {
            whens: vec![Criteria::or(vec![
                Criteria::eq(element("e1"), Expression::integer(1)),
                Criteria::eq(element("e2"), Expression::integer(2)),
            ])],
            thens: vec![Expression::integer(1)],
            else_expr: None,
        })
        .named("expr5"),
        Expression::ScalarSubquery(Box::new(simple_select("e1", "g2"))).named("expr6"),
        Expression::binary(
            "*",
            Expression::integer(-1),
            Expression::binary("-", element("e1"), Expression::integer(-3)),
        )
        .named("expr7"),
        Expression::AllInGroup("pm1.g1".into()),
        Expression::All,
    ];
    assert_round_trip(&Command::select(symbols, vec![FromClause::group("pm1.g1")]));
}

#[test]
fn test_every_criteria() {
    let criteria = Criteria::and(vec![
        Criteria::Between(BetweenCriteria {
            expression: element("e1"),
            lower: Expression::integer(1),
            upper: Expression::integer(5),
            negated: true,
        }),
        Criteria::Match(MatchCriteria {
            expression: element("e2"),
            pattern: Expression::string("a%"),
            escape: Some('\\'),
            negated: false,
        }),
        Criteria::Set(SetCriteria {
            expression: element("e3"),
            values: vec![Expression::integer(1), Expression::Reference(0)],
            negated: false,
        }),
        Criteria::SubquerySet(SubquerySetCriteria {
            expression: element("e4"),
            command: Box::new(simple_select("e1", "h")),
            negated: true,
        }),
        Criteria::SubqueryCompare(SubqueryCompareCriteria {
            expression: element("e5"),
            operator: CompareOperator::Le,
            quantifier: Quantifier::Some,
            command: Box::new(simple_select("e1", "h")),
        }),
        Criteria::Exists(Box::new(simple_select("e1", "h"))),
        Criteria::or(vec![
            Criteria::eq(element("e6"), Expression::integer(1)),
            Criteria::eq(element("e7"), Expression::integer(2)).negate(),
        ]),
        Criteria::Translate(TranslateCriteria {
            selector: CriteriaSelector::default(),
            translations: vec![Criteria::eq(element("e1"), Expression::integer(1))],
        }),
        Criteria::Has(HasCriteria {
            selector: CriteriaSelector {
                selector_type: SelectorType::Between,
                elements: vec![ElementSymbol::new("e1")],
            },
        }),
    ]);
    let command = Command::Delete(Delete {
        group: GroupSymbol::new("g"),
        criteria: Some(criteria),
        option: None,
    });
    assert_round_trip(&command);
}

#[test]
fn test_from_forms() {
    let mut hinted = FromClause::group("a").join(JoinType::Cross, FromClause::group("b"), vec![]);
    hinted.hints_mut().optional = true;
    hinted.hints_mut().make_dep = true;

    let mut subquery = FromClause::Subquery(SubqueryFromClause {
        alias: "s".into(),
        command: Box::new(simple_select("e1", "h")),
        hints: Default::default(),
    });
    subquery.hints_mut().make_not_dep = true;

    let from = vec![
        FromClause::group("c").join(JoinType::FullOuter, hinted, vec![
            Criteria::eq(element("c.e1"), element("a.e1")),
            Criteria::eq(element("c.e2"), element("b.e2")),
        ]),
        subquery,
        FromClause::group("x")
            .join(JoinType::Union, FromClause::group("y"), vec![])
            .join(JoinType::RightOuter, FromClause::aliased("z", "zz"), vec![Criteria::eq(
                element("x.e1"),
                element("zz.e1"),
            )]),
    ];
    assert_round_trip(&Command::select(vec![Expression::All], from));
}

#[test]
fn test_set_query() {
    let mut left = simple_select("e1", "g");
    if let Command::Query(query) = &mut left {
        query.limit = Some(Limit {
            offset: None,
            row_limit: Expression::integer(5),
        });
    }
    let right = Command::SetQuery(SetQuery {
        operation: SetOperation::Intersect,
        all: true,
        left: Box::new(simple_select("e1", "h")),
        right: Box::new(simple_select("e1", "i")),
        order_by: None,
        limit: None,
        option: None,
    });
    let command = Command::SetQuery(SetQuery {
        operation: SetOperation::Except,
        all: false,
        left: Box::new(left),
        right: Box::new(right),
        order_by: Some(OrderBy {
            items: vec![OrderByItem {
                expression: element("e1"),
                ascending: true,
            }],
        }),
        limit: None,
        option: Some(QueryOption {
            debug: true,
            ..QueryOption::default()
        }),
    });
    assert_round_trip(&command);
}

#[test]
fn test_data_manipulation() {
    assert_round_trip(&Command::Insert(Insert {
        group: GroupSymbol::new("pm1.g1"),
        variables: vec![ElementSymbol::new("e1"), ElementSymbol::new("e2")],
        source: InsertSource::Values(vec![Expression::Reference(0), Expression::string("b")]),
        option: None,
    }));
    assert_round_trip(&Command::Insert(Insert {
        group: GroupSymbol::new("#t"),
        variables: vec![],
        source: InsertSource::Query(Box::new(simple_select("e1", "g"))),
        option: Some(QueryOption {
            plan_only: true,
            ..QueryOption::default()
        }),
    }));
    assert_round_trip(&Command::Update(Update {
        group: GroupSymbol::new("g"),
        changes: vec![
            SetClause {
                symbol: ElementSymbol::new("e1"),
                value: Expression::binary("||", element("e1"), Expression::string("x")),
            },
            SetClause {
                symbol: ElementSymbol::new("e2"),
                value: Expression::null(),
            },
        ],
        criteria: Some(Criteria::eq(element("e3"), Expression::Reference(0))),
        option: None,
    }));
}

#[test]
fn test_procedure_calls() {
    assert_round_trip(&Command::StoredProcedure(StoredProcedure {
        name: "pm1.sq1".into(),
        parameters: vec![
            SpParameter {
                index: 1,
                name: None,
                value: Some(Expression::integer(1)),
                direction: ParameterDirection::In,
            },
            SpParameter {
                index: 2,
                name: None,
                value: Some(Expression::Reference(0)),
                direction: ParameterDirection::In,
            },
        ],
        option: None,
        display_named_parameters: false,
    }));
    assert_round_trip(&Command::StoredProcedure(StoredProcedure {
        name: "proc1".into(),
        parameters: vec![SpParameter {
            index: 1,
            name: Some("param1".into()),
            value: Some(Expression::string("v")),
            direction: ParameterDirection::In,
        }],
        option: Some(QueryOption {
            no_cache: true,
            ..QueryOption::default()
        }),
        display_named_parameters: true,
    }));
    assert_round_trip(&Command::StoredProcedure(StoredProcedure {
        name: "proc1".into(),
        parameters: vec![
            SpParameter {
                index: 1,
                name: None,
                value: None,
                direction: ParameterDirection::Return,
            },
            SpParameter {
                index: 2,
                name: None,
                value: Some(Expression::integer(1)),
                direction: ParameterDirection::In,
            },
        ],
        option: None,
        display_named_parameters: false,
    }));
}

#[test]
fn test_dynamic_and_definitions() {
    assert_round_trip(&Command::Dynamic(DynamicCommand {
        sql: Expression::string("SELECT 1"),
        as_columns: Some(vec![
            ColumnDefinition::new("a", DataType::String),
            ColumnDefinition::new("b", DataType::BigDecimal),
        ]),
        into_group: Some(GroupSymbol::new("#t")),
        using: Some(vec![SetClause {
            symbol: ElementSymbol::new("x"),
            value: Expression::integer(1),
        }]),
        update_count: Some(UpdateCount::Count(1)),
    }));
    assert_round_trip(&Command::Create(Create {
        table: GroupSymbol::new("#t"),
        columns: vec![
            ColumnDefinition::new("a", DataType::Clob),
            ColumnDefinition::new("b", DataType::Xml),
        ],
    }));
    assert_round_trip(&Command::Drop(Drop {
        table: GroupSymbol::new("#t"),
    }));
    assert_round_trip(&Command::XQuery(XQuery {
        text: "<a/>".into(),
        option: Some(QueryOption {
            debug: true,
            ..QueryOption::default()
        }),
    }));
}

#[test]
fn test_procedure_block() {
    let block = Block::new(vec![
        Statement::Declare(DeclareStatement {
            variable: ElementSymbol::new("x"),
            data_type: DataType::Integer,
            value: Some(AssignmentValue::Expression(Expression::integer(1))),
        }),
        Statement::Assignment(AssignmentStatement {
            variable: ElementSymbol::new("vars.y"),
            value: AssignmentValue::Command(Box::new(simple_select("e1", "g"))),
        }),
        Statement::If(IfStatement {
            condition: Criteria::Has(HasCriteria {
                selector: CriteriaSelector {
                    selector_type: SelectorType::CompareEq,
                    elements: vec![ElementSymbol::new("e1")],
                },
            }),
            then_block: Block::new(vec![Statement::Continue]),
            else_block: Some(Block::new(vec![])),
        }),
        Statement::Loop(LoopStatement {
            cursor: "c".into(),
            command: Box::new(Command::select(vec![Expression::All], vec![FromClause::group("g")])),
            block: Block::new(vec![Statement::Break]),
        }),
        Statement::While(WhileStatement {
            condition: Criteria::compare(element("x"), CompareOperator::Lt, Expression::integer(10)),
            block: Block::new(vec![Statement::RaiseError(Expression::string("boom"))]),
        }),
        Statement::Command(Box::new(Command::Delete(Delete {
            group: GroupSymbol::new("g"),
            criteria: None,
            option: None,
        }))),
    ]);
    assert_round_trip(&Command::UpdateProcedure(CreateUpdateProcedureCommand {
        block,
        update_procedure: true,
    }));
}
