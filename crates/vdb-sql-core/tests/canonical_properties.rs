//! Property tests: canonical rendering is a fixed point of the parser.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use vdb_sql_core::ast::{
    AssignmentStatement, AssignmentValue, BetweenCriteria, Block, CommandType, CompareOperator,
    CreateUpdateProcedureCommand, Criteria, DataType, DeclareStatement, Delete, ElementSymbol,
    Expression, FromClause, FromHints, GroupSymbol, IfStatement, Insert, InsertSource,
    IsNullCriteria, JoinType, LoopStatement, MatchCriteria, Query, SetClause, SetCriteria,
    SetOperation, SetQuery, Statement, SubqueryFromClause, SubquerySetCriteria, Update, Value,
    WhileStatement,
};
use vdb_sql_core::lexer::Keyword;
use vdb_sql_core::{
    get_command_type, parse_command, parse_criteria, parse_statement, Command, ParseInfo,
};

fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("e1".to_string()),
        Just("pm1.g1.e2".to_string()),
        Just("select".to_string()),
        Just("my col".to_string()),
        "[a-z][a-z0-9_]{0,6}",
    ]
}

/// Unquoted names usable as aliases and procedure variables.
fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}".prop_filter("keywords need quoting", |name| {
        Keyword::from_str(name).is_none()
    })
}

fn constant() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Integer),
        any::<i64>()
            .prop_filter("outside 32 bits", |n| i32::try_from(*n).is_err())
            .prop_map(Value::Long),
        (-1e9..1e9f64).prop_map(Value::Double),
        "[a-zA-Z0-9 ']{0,10}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Boolean),
        Just(Value::Null),
    ]
}

fn expression() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        constant().prop_map(Expression::Constant),
        name().prop_map(|name| Expression::element(name)),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (
                prop::sample::select(vec!["+", "-", "*", "/", "||"]),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, left, right)| Expression::binary(op, left, right)),
            (
                prop::sample::select(vec!["concat", "abs", "ucase", "pm1.udf"]),
                prop::collection::vec(inner, 0..3)
            )
                .prop_map(|(name, args)| Expression::function(name, args)),
        ]
    })
}

fn compare_operator() -> impl Strategy<Value = CompareOperator> {
    prop::sample::select(vec![
        CompareOperator::Eq,
        CompareOperator::Ne,
        CompareOperator::Lt,
        CompareOperator::Le,
        CompareOperator::Gt,
        CompareOperator::Ge,
    ])
}

fn predicate() -> impl Strategy<Value = Criteria> {
    prop_oneof![
        (expression(), compare_operator(), expression())
            .prop_map(|(left, op, right)| Criteria::compare(left, op, right)),
        (expression(), any::<bool>()).prop_map(|(expression, negated)| {
            Criteria::IsNull(IsNullCriteria {
                expression,
                negated,
            })
        }),
        (expression(), expression(), expression(), any::<bool>()).prop_map(
            |(expression, lower, upper, negated)| {
                Criteria::Between(BetweenCriteria {
                    expression,
                    lower,
                    upper,
                    negated,
                })
            }
        ),
        (
            expression(),
            prop::collection::vec(expression(), 1..4),
            any::<bool>()
        )
            .prop_map(|(expression, values, negated)| {
                Criteria::Set(SetCriteria {
                    expression,
                    values,
                    negated,
                })
            }),
        (
            expression(),
            "[a-z%_]{0,6}",
            prop::option::of(prop::sample::select(vec!['#', '\\', '\''])),
            any::<bool>()
        )
            .prop_map(|(expression, pattern, escape, negated)| {
                Criteria::Match(MatchCriteria {
                    expression,
                    pattern: Expression::string(pattern),
                    escape,
                    negated,
                })
            }),
    ]
}

fn criteria() -> impl Strategy<Value = Criteria> {
    predicate().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Criteria::and),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Criteria::or),
            inner.prop_map(Criteria::negate),
        ]
    })
}

/// Names select-list expressions the way the parser does.
fn select_symbols(expressions: Vec<Expression>) -> Vec<Expression> {
    let mut generated = 0usize;
    expressions
        .into_iter()
        .map(|expression| match expression {
            Expression::Element(_) => expression,
            other => {
                let name = if generated == 0 {
                    "expr".to_string()
                } else {
                    format!("expr{generated}")
                };
                generated += 1;
                other.named(name)
            }
        })
        .collect()
}

fn query() -> impl Strategy<Value = Command> {
    (
        prop::collection::vec(expression(), 1..4),
        name(),
        prop::option::of(criteria()),
        any::<bool>(),
    )
        .prop_map(|(symbols, group, criteria, distinct)| {
            let mut query = Query {
                from: vec![FromClause::group(group)],
                criteria,
                ..Query::default()
            };
            query.select.distinct = distinct;
            query.select.symbols = select_symbols(symbols);
            Command::Query(query)
        })
}

fn set_query(operands: BoxedStrategy<Command>) -> impl Strategy<Value = Command> {
    (
        prop::sample::select(vec![
            SetOperation::Union,
            SetOperation::Intersect,
            SetOperation::Except,
        ]),
        any::<bool>(),
        operands.clone(),
        operands,
    )
        .prop_map(|(operation, all, left, right)| {
            Command::SetQuery(SetQuery {
                operation,
                all,
                left: Box::new(left),
                right: Box::new(right),
                order_by: None,
                limit: None,
                option: None,
            })
        })
}

fn join_type() -> impl Strategy<Value = JoinType> {
    prop::sample::select(vec![
        JoinType::Inner,
        JoinType::Cross,
        JoinType::LeftOuter,
        JoinType::RightOuter,
        JoinType::FullOuter,
        JoinType::Union,
    ])
}

/// A FROM item: a group, a subquery, or a join tree over both.
fn from_item(subqueries: BoxedStrategy<Command>) -> impl Strategy<Value = FromClause> {
    let leaf = prop_oneof![
        3 => (name(), prop::option::of(identifier())).prop_map(|(group, alias)| match alias {
            Some(alias) => FromClause::aliased(group, alias),
            None => FromClause::group(group),
        }),
        1 => (subqueries, identifier()).prop_map(|(command, alias)| {
            FromClause::Subquery(SubqueryFromClause {
                alias,
                command: Box::new(command),
                hints: FromHints::default(),
            })
        }),
    ];
    leaf.prop_recursive(3, 8, 2, |inner| {
        (
            inner.clone(),
            join_type(),
            inner,
            prop::collection::vec(predicate(), 1..3),
        )
            .prop_map(|(left, join_type, right, on)| {
                let criteria = if join_type.requires_criteria() {
                    on
                } else {
                    vec![]
                };
                left.join(join_type, right, criteria)
            })
    })
}

fn subquery_criteria(subqueries: BoxedStrategy<Command>) -> impl Strategy<Value = Criteria> {
    let subquery = prop_oneof![
        subqueries
            .clone()
            .prop_map(|command| Criteria::Exists(Box::new(command))),
        (expression(), subqueries, any::<bool>()).prop_map(|(expression, command, negated)| {
            Criteria::SubquerySet(SubquerySetCriteria {
                expression,
                command: Box::new(command),
                negated,
            })
        }),
    ];
    (subquery, prop::option::of(predicate())).prop_map(|(subquery, other)| match other {
        Some(other) => Criteria::and(vec![subquery, other]),
        None => subquery,
    })
}

/// A query with subqueries in the select list, FROM clause and WHERE clause.
fn query_with_subqueries(subqueries: BoxedStrategy<Command>) -> impl Strategy<Value = Command> {
    (
        prop::collection::vec(expression(), 1..3),
        prop::option::of(subqueries.clone()),
        prop::collection::vec(from_item(subqueries.clone()), 1..3),
        prop::option::of(subquery_criteria(subqueries)),
    )
        .prop_map(|(mut symbols, scalar, from, criteria)| {
            if let Some(scalar) = scalar {
                symbols.push(Expression::ScalarSubquery(Box::new(scalar)));
            }
            let mut query = Query {
                from,
                criteria,
                ..Query::default()
            };
            query.select.symbols = select_symbols(symbols);
            Command::Query(query)
        })
}

/// Queries and set queries nested on both sides and through subqueries.
fn command() -> BoxedStrategy<Command> {
    query()
        .prop_recursive(3, 12, 2, |inner| {
            prop_oneof![set_query(inner.clone()), query_with_subqueries(inner)]
        })
        .boxed()
}

fn joined_query() -> impl Strategy<Value = Command> {
    (
        prop::collection::vec(expression(), 1..3),
        prop::collection::vec(from_item(query().boxed()), 1..3),
    )
        .prop_map(|(symbols, from)| {
            let mut query = Query {
                from,
                ..Query::default()
            };
            query.select.symbols = select_symbols(symbols);
            Command::Query(query)
        })
}

fn dml() -> impl Strategy<Value = Command> {
    let value = prop_oneof![
        expression(),
        command().prop_map(|command| Expression::ScalarSubquery(Box::new(command))),
    ];
    prop_oneof![
        (
            name(),
            prop::collection::vec(identifier(), 0..3),
            command()
        )
            .prop_map(|(group, variables, source)| {
                Command::Insert(Insert {
                    group: GroupSymbol::new(group),
                    variables: variables.into_iter().map(ElementSymbol::new).collect(),
                    source: InsertSource::Query(Box::new(source)),
                    option: None,
                })
            }),
        (
            name(),
            prop::collection::vec((identifier(), value), 1..3),
            prop::option::of(criteria())
        )
            .prop_map(|(group, changes, criteria)| {
                Command::Update(Update {
                    group: GroupSymbol::new(group),
                    changes: changes
                        .into_iter()
                        .map(|(symbol, value)| SetClause {
                            symbol: ElementSymbol::new(symbol),
                            value,
                        })
                        .collect(),
                    criteria,
                    option: None,
                })
            }),
        (name(), prop::option::of(subquery_criteria(command()))).prop_map(|(group, criteria)| {
            Command::Delete(Delete {
                group: GroupSymbol::new(group),
                criteria,
                option: None,
            })
        }),
    ]
}

fn data_type() -> impl Strategy<Value = DataType> {
    prop::sample::select(vec![
        DataType::String,
        DataType::Integer,
        DataType::Boolean,
        DataType::Double,
        DataType::Object,
    ])
}

fn assignment_value() -> impl Strategy<Value = AssignmentValue> {
    prop_oneof![
        expression().prop_map(AssignmentValue::Expression),
        command().prop_map(|command| {
            AssignmentValue::Expression(Expression::ScalarSubquery(Box::new(command)))
        }),
        command().prop_map(|command| AssignmentValue::Command(Box::new(command))),
    ]
}

fn statement() -> impl Strategy<Value = Statement> {
    let leaf = prop_oneof![
        Just(Statement::Break),
        Just(Statement::Continue),
        expression().prop_map(Statement::RaiseError),
        (data_type(), identifier(), prop::option::of(assignment_value())).prop_map(
            |(data_type, variable, value)| {
                Statement::Declare(DeclareStatement {
                    variable: ElementSymbol::new(variable),
                    data_type,
                    value,
                })
            }
        ),
        (identifier(), assignment_value()).prop_map(|(variable, value)| {
            Statement::Assignment(AssignmentStatement {
                variable: ElementSymbol::new(variable),
                value,
            })
        }),
        prop_oneof![query(), dml()].prop_map(|command| Statement::Command(Box::new(command))),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        let block = prop::collection::vec(inner, 0..3)
            .prop_map(Block::new)
            .boxed();
        prop_oneof![
            (criteria(), block.clone(), prop::option::of(block.clone())).prop_map(
                |(condition, then_block, else_block)| {
                    Statement::If(IfStatement {
                        condition,
                        then_block,
                        else_block,
                    })
                }
            ),
            (criteria(), block.clone()).prop_map(|(condition, block)| {
                Statement::While(WhileStatement { condition, block })
            }),
            (identifier(), command(), block).prop_map(|(cursor, command, block)| {
                Statement::Loop(LoopStatement {
                    cursor,
                    command: Box::new(command),
                    block,
                })
            }),
        ]
    })
}

fn procedure() -> impl Strategy<Value = Command> {
    (any::<bool>(), prop::collection::vec(statement(), 0..4)).prop_map(
        |(update_procedure, statements)| {
            Command::UpdateProcedure(CreateUpdateProcedureCommand {
                block: Block::new(statements),
                update_procedure,
            })
        },
    )
}

/// Checks that the canonical text parses back to `command`.
fn assert_reparses(command: &Command) -> Result<(), TestCaseError> {
    let text = command.to_string();
    let reparsed = parse_command(text.as_str(), &ParseInfo::default());
    prop_assert_eq!(reparsed.as_ref(), Ok(command), "text: {}", text);
    Ok(())
}

proptest! {
    #[test]
    fn criteria_round_trip(criteria in criteria()) {
        let text = criteria.to_string();
        let reparsed = parse_criteria(text.as_str(), &ParseInfo::default());
        prop_assert_eq!(reparsed, Ok(criteria), "text: {}", text);
    }

    #[test]
    fn query_round_trip(command in query()) {
        let text = command.to_string();
        let reparsed = parse_command(text.as_str(), &ParseInfo::default());
        prop_assert_eq!(reparsed.as_ref(), Ok(&command), "text: {}", text);
        if let Ok(reparsed) = reparsed {
            prop_assert_eq!(reparsed.to_string(), text);
        }
    }

    #[test]
    fn sniffer_classifies_generated_queries(command in query()) {
        prop_assert_eq!(get_command_type(command.to_string().as_str()), CommandType::Query);
    }

    #[test]
    fn nested_command_round_trip(command in command()) {
        assert_reparses(&command)?;
    }

    #[test]
    fn join_tree_round_trip(command in joined_query()) {
        assert_reparses(&command)?;
    }

    #[test]
    fn dml_round_trip(command in dml()) {
        assert_reparses(&command)?;
    }

    #[test]
    fn statement_round_trip(statement in statement()) {
        let text = statement.to_string();
        let reparsed = parse_statement(text.as_str(), &ParseInfo::default());
        prop_assert_eq!(reparsed, Ok(statement), "text: {}", text);
    }

    #[test]
    fn procedure_round_trip(command in procedure()) {
        assert_reparses(&command)?;
    }
}
