//! Run compiled requests against an in-memory SQLite database.

use std::collections::BTreeMap;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use sieve_execution::{Error, Executor};
use sieve_metadata as metadata;
use sieve_sql::sql::ast;
use sieve_sql::sql::helpers;
use sieve_translation::translation::query::QueryCompiler;
use sieve_translation::translation::request::{
    Aggregation, AggregationOp, CustomField, CustomFilter, Filter, FilterRequest, Group, Operator,
    Pagination, Sort,
};
use sieve_translation::translation::scopes::{ScopeKind, ScopeRegistry};

fn tables() -> Arc<metadata::TablesInfo> {
    let fields = [
        ("Id", "id"),
        ("Name", "name"),
        ("Status", "status"),
        ("Age", "age"),
    ];
    Arc::new(metadata::TablesInfo(BTreeMap::from([(
        "users".to_string(),
        metadata::TableInfo {
            table_name: "users".to_string(),
            fields: fields
                .iter()
                .map(|(field, column)| {
                    (
                        (*field).to_string(),
                        metadata::FieldInfo {
                            column: (*column).to_string(),
                        },
                    )
                })
                .collect(),
        },
    )])))
}

/// Three active users and two inactive ones.
async fn setup() -> anyhow::Result<(Executor, QueryCompiler)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, \
         status TEXT NOT NULL, age INTEGER NOT NULL)",
    )
    .execute(&pool)
    .await?;

    let rows: [(i64, &str, &str, i64); 5] = [
        (1, "alice", "active", 30),
        (2, "bob", "active", 40),
        (3, "carol", "active", 50),
        (4, "dave", "inactive", 60),
        (5, "erin", "inactive", 70),
    ];
    for (id, name, status, age) in rows {
        sqlx::query("INSERT INTO users (id, name, status, age) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(status)
            .bind(age)
            .execute(&pool)
            .await?;
    }

    let compiler = QueryCompiler::new(tables(), "users", Arc::new(ScopeRegistry::new()))?;
    Ok((Executor::new(pool), compiler))
}

#[derive(Debug, PartialEq, sqlx::FromRow)]
struct User {
    id: i64,
    name: String,
    status: String,
    age: i64,
}

fn filter(field: &str, op: Operator, value: &str) -> Filter {
    Filter {
        field: field.to_string(),
        op,
        value: value.to_string(),
        ..Filter::default()
    }
}

fn sort_by_id() -> Sort {
    Sort {
        field: "Id".to_string(),
        ..Sort::default()
    }
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| user.name.as_str()).collect()
}

#[tokio::test]
async fn test_exact_match_round_trips() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    let mut request = FilterRequest {
        filters: vec![filter("Name", Operator::Eq, "alice")],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["alice"]);
    Ok(())
}

#[tokio::test]
async fn test_zero_matches_is_an_empty_success() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    let mut request = FilterRequest {
        filters: vec![filter("Name", Operator::Eq, "zelda")],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert!(users.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_case_insensitive_filter_matches_stored_lowercase() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    let mut eq = filter("Status", Operator::Eq, "ACTIVE");
    eq.nocase = true;
    let mut request = FilterRequest {
        filters: vec![eq],
        sorts: vec![sort_by_id()],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["alice", "bob", "carol"]);
    Ok(())
}

#[tokio::test]
async fn test_comparison_and_range_operators() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;

    let mut request = FilterRequest {
        filters: vec![filter("Age", Operator::Gt, "45")],
        sorts: vec![sort_by_id()],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["carol", "dave", "erin"]);

    let mut request = FilterRequest {
        filters: vec![filter("Age", Operator::Between, "35,65")],
        sorts: vec![sort_by_id()],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["bob", "carol", "dave"]);

    let mut request = FilterRequest {
        filters: vec![filter("Name", Operator::In, "alice,erin")],
        sorts: vec![sort_by_id()],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["alice", "erin"]);

    let mut request = FilterRequest {
        filters: vec![filter("Name", Operator::Contains, "ar")],
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["carol"]);
    Ok(())
}

#[tokio::test]
async fn test_pagination_slices_pages_and_sets_total() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;

    let mut request = FilterRequest {
        filters: vec![filter("Status", Operator::Eq, "active")],
        sorts: vec![sort_by_id()],
        page: Some(Pagination {
            page: 1,
            page_size: 2,
            total: 0,
        }),
        ..FilterRequest::default()
    };
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["alice", "bob"]);
    assert_eq!(request.page.as_ref().unwrap().total, 3);

    request.page = Some(Pagination {
        page: 2,
        page_size: 2,
        total: 0,
    });
    let users: Vec<User> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(names(&users), vec!["carol"]);
    assert_eq!(request.page.as_ref().unwrap().total, 3);
    Ok(())
}

#[tokio::test]
async fn test_find_one_returns_the_first_match_or_not_found() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;

    let mut request = FilterRequest {
        filters: vec![filter("Name", Operator::Eq, "bob")],
        ..FilterRequest::default()
    };
    let user: User = executor.find_one(&compiler, &mut request).await?;
    assert_eq!(user.age, 40);

    let mut request = FilterRequest {
        filters: vec![filter("Name", Operator::Eq, "zelda")],
        ..FilterRequest::default()
    };
    let result = executor.find_one::<User>(&compiler, &mut request).await;
    assert!(matches!(result, Err(Error::NotFound)));
    Ok(())
}

#[tokio::test]
async fn test_count_over_the_filtered_state() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    let request = FilterRequest {
        filters: vec![filter("Status", Operator::Eq, "inactive")],
        ..FilterRequest::default()
    };
    assert_eq!(executor.count(&compiler, &request).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_fields_refuse_execution() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    let mut request = FilterRequest {
        filters: vec![filter("Bogus", Operator::Eq, "1")],
        sorts: vec![Sort {
            field: "Nope".to_string(),
            ..Sort::default()
        }],
        ..FilterRequest::default()
    };
    match executor.find_all::<User>(&compiler, &mut request).await {
        Err(Error::Compile(errors)) => assert_eq!(errors.0.len(), 2),
        other => panic!("expected a compile error, got {other:?}"),
    }
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct AverageAge {
    age: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct AliasedAverageAge {
    average_age: f64,
}

#[tokio::test]
async fn test_aggregation_alias_defaults_to_the_column_name() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;

    let mut request = FilterRequest {
        aggrs: vec![Aggregation {
            field: "Age".to_string(),
            op: AggregationOp::Avg,
            ..Aggregation::default()
        }],
        ..FilterRequest::default()
    };
    let rows: Vec<AverageAge> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(rows.len(), 1);
    assert!((rows[0].age - 50.0).abs() < f64::EPSILON);

    let mut request = FilterRequest {
        aggrs: vec![Aggregation {
            field: "Age".to_string(),
            op: AggregationOp::Avg,
            alias: Some("average_age".to_string()),
            ..Aggregation::default()
        }],
        ..FilterRequest::default()
    };
    let rows: Vec<AliasedAverageAge> = executor.find_all(&compiler, &mut request).await?;
    assert!((rows[0].average_age - 50.0).abs() < f64::EPSILON);
    Ok(())
}

#[derive(Debug, PartialEq, sqlx::FromRow)]
struct StatusCount {
    status: String,
    cnt: i64,
}

#[tokio::test]
async fn test_grouping_partitions_rows() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    let mut request = FilterRequest {
        groups: vec![Group {
            field: "Status".to_string(),
            ..Group::default()
        }],
        aggrs: vec![
            Aggregation {
                field: "Id".to_string(),
                op: AggregationOp::Count,
                alias: Some("cnt".to_string()),
                ..Aggregation::default()
            },
            Aggregation {
                field: "Status".to_string(),
                op: AggregationOp::Max,
                alias: Some("status".to_string()),
                ..Aggregation::default()
            },
        ],
        sorts: vec![Sort {
            field: "Status".to_string(),
            ..Sort::default()
        }],
        ..FilterRequest::default()
    };
    let rows: Vec<StatusCount> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(
        rows,
        vec![
            StatusCount {
                status: "active".to_string(),
                cnt: 3,
            },
            StatusCount {
                status: "inactive".to_string(),
                cnt: 2,
            },
        ]
    );
    Ok(())
}

fn users_status() -> ast::Expression {
    ast::Expression::ColumnReference(ast::ColumnReference::TableColumn {
        table: ast::TableName("users".to_string()),
        name: ast::ColumnName("status".to_string()),
    })
}

#[tokio::test]
async fn test_filter_and_group_scopes_compose() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    compiler.register_scope(ScopeKind::Filter, "only_active", |mut select: ast::Select| {
        let predicate = ast::Expression::BinaryOperation {
            left: Box::new(users_status()),
            operator: ast::BinaryOperator::Equals,
            right: Box::new(helpers::string_value("active".to_string())),
        };
        select.where_ = ast::Where(helpers::and_expr(select.where_.0, predicate));
        select
    });
    // a group scope owns projection as well as grouping
    compiler.register_scope(ScopeKind::Group, "by_status", |mut select: ast::Select| {
        select.group_by.elements.push(users_status());
        select.select_list = ast::SelectList::SelectList(vec![
            (
                helpers::make_column_alias("status".to_string()),
                users_status(),
            ),
            (
                helpers::make_column_alias("cnt".to_string()),
                ast::Expression::Count(ast::CountType::Star),
            ),
        ]);
        select
    });

    let mut request = FilterRequest {
        custom_filter: Some(CustomFilter {
            scope: "only_active".to_string(),
        }),
        groups: vec![Group {
            scope: Some("by_status".to_string()),
            ..Group::default()
        }],
        ..FilterRequest::default()
    };
    let rows: Vec<StatusCount> = executor.find_all(&compiler, &mut request).await?;
    assert_eq!(
        rows,
        vec![StatusCount {
            status: "active".to_string(),
            cnt: 3,
        }]
    );
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct StatusOnly {
    status: String,
}

#[tokio::test]
async fn test_distinct_with_a_select_scope() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    compiler.register_scope(ScopeKind::Select, "status_only", |mut select: ast::Select| {
        select.select_list = ast::SelectList::SelectList(vec![(
            helpers::make_column_alias("status".to_string()),
            users_status(),
        )]);
        select
    });

    let mut request = FilterRequest {
        custom_fields: vec![CustomField {
            name: "status".to_string(),
            scope: "status_only".to_string(),
        }],
        distinct: true,
        sorts: vec![Sort {
            field: "Status".to_string(),
            ..Sort::default()
        }],
        ..FilterRequest::default()
    };
    let rows: Vec<StatusOnly> = executor.find_all(&compiler, &mut request).await?;
    let statuses: Vec<&str> = rows.iter().map(|row| row.status.as_str()).collect();
    assert_eq!(statuses, vec!["active", "inactive"]);
    Ok(())
}

#[tokio::test]
async fn test_backend_errors_propagate_unwrapped() -> anyhow::Result<()> {
    let (executor, compiler) = setup().await?;
    compiler.register_scope(ScopeKind::Filter, "broken", |mut select: ast::Select| {
        select.where_ = ast::Where(ast::Expression::RawSql(ast::RawSql(
            "this is not sql".to_string(),
        )));
        select
    });

    let mut request = FilterRequest {
        custom_filter: Some(CustomFilter {
            scope: "broken".to_string(),
        }),
        ..FilterRequest::default()
    };
    let result = executor.find_all::<User>(&compiler, &mut request).await;
    assert!(matches!(result, Err(Error::Database(_))));
    Ok(())
}
