//! End-to-end statement compilation through contexts and sessions.

mod common;
use common::*;

use sqlscope_orm::context::{InsertContext, QueryContext, SelectContext, UpdateContext};
use sqlscope_orm::criteria::Criteria;
use sqlscope_orm::{
    CompileError, CriteriaError, DialectKind, QueryConfig, QueryError, Session, SqlCompiler,
    SqlType, Value,
};

fn compile(context: impl Into<QueryContext>) -> sqlscope_orm::Statement {
    SqlCompiler::from_config(&QueryConfig::default())
        .compile(&context.into())
        .unwrap_or_else(|e| panic!("compile failed: {e}"))
}

// ===================================================================
// SELECT
// ===================================================================

#[test]
fn limit_and_offset_are_bound() {
    let statement = session()
        .select::<Employee>(|c| {
            c.limit(|| 10);
            c.offset(|| 5);
        })
        .unwrap();
    assert!(statement.text().ends_with(" LIMIT ? OFFSET ?"));
    assert_eq!(statement.values(), &[Value::of(10_i64), Value::of(5_i64)]);
    assert_eq!(statement.values().len(), statement.placeholder_count());
}

#[test]
fn select_uses_embedded_columns_and_renamed_columns() {
    let statement = session()
        .select::<Employee>(|c| {
            c.where_clause(|w| {
                w.eq("address.city", "Springfield").ge("age", 30_i32);
            });
            c.order_by(|o| {
                o.desc("name");
            });
        })
        .unwrap();
    assert_eq!(
        statement.text(),
        "SELECT id, EMPLOYEE_NAME, age, street, CITY, created, updated, version \
         FROM EMPLOYEE WHERE CITY = ? AND age >= ? ORDER BY EMPLOYEE_NAME DESC"
    );
    assert_eq!(statement.values().len(), statement.placeholder_count());
}

#[test]
fn or_groups_and_in_lists() {
    let statement = session()
        .select::<Employee>(|c| {
            c.where_clause(|w| {
                w.in_list("id", [1_i64, 2, 3]);
                w.or(|w| {
                    w.like("name", "A%").is_not_null("version");
                });
            });
        })
        .unwrap();
    assert!(statement.text().ends_with(
        "WHERE id IN (?, ?, ?) OR (EMPLOYEE_NAME LIKE ? AND version IS NOT NULL)"
    ));
    assert_eq!(statement.values().len(), 4);
    assert_eq!(
        statement.log().unwrap().rsplit("WHERE ").next(),
        Some("id IN (1, 2, 3) OR (EMPLOYEE_NAME LIKE 'A%' AND version IS NOT NULL)")
    );
}

#[test]
fn same_declarations_compile_identically() {
    let declare = |c: &mut sqlscope_orm::criteria::CriteriaScope| {
        c.where_clause(|w| {
            w.between("age", 20_i32, 30_i32);
        });
        c.limit(|| 3);
    };
    let first = session().select::<Employee>(declare).unwrap();
    let second = session().select::<Employee>(declare).unwrap();
    assert_eq!(first, second);
}

#[test]
fn count_by_composite_key() {
    let statement = session()
        .count::<OrderLine>(|c| {
            c.where_clause(|w| {
                w.eq("orderId", 7_i64).gt("quantity", 0_i32);
            });
        })
        .unwrap();
    assert_eq!(
        statement.text(),
        "SELECT COUNT(*) FROM sales.order_line WHERE order_id = ? AND quantity > ?"
    );
}

#[test]
fn unknown_property_is_reported() {
    let err = session()
        .select::<Employee>(|c| {
            c.order_by(|o| {
                o.asc("salary");
            });
        })
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Compile(CompileError::UnknownProperty { ref property, .. }) if property == "salary"
    ));
}

#[test]
fn negative_offset_is_a_criteria_error() {
    let err = session()
        .select::<Employee>(|c| {
            c.offset(|| -1);
        })
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Criteria(CriteriaError::NegativeOffset(-1))
    ));
}

#[test]
fn mysql_paging_and_quoting() {
    let session = Session::new(QueryConfig {
        dialect: DialectKind::MySql,
        ..QueryConfig::default()
    });
    let statement = session
        .select::<Ticket>(|c| {
            c.offset(|| 20);
        })
        .unwrap();
    assert_eq!(
        statement.text(),
        "SELECT id, title FROM `ticket` LIMIT 18446744073709551615 OFFSET ?"
    );
    assert_eq!(statement.values(), &[Value::of(20_i64)]);
}

// ===================================================================
// INSERT / UPDATE / DELETE
// ===================================================================

#[test]
fn insert_omits_identity_columns() {
    let ticket = Ticket {
        id: 0,
        title: "broken".into(),
    };
    let statement = compile(InsertContext::for_entity(metamodel::<Ticket>(), &ticket).unwrap());
    assert_eq!(statement.text(), "INSERT INTO \"ticket\" (title) VALUES (?)");
    assert_eq!(statement.log(), Some("INSERT INTO \"ticket\" (title) VALUES ('broken')"));
}

#[test]
fn insert_binds_typed_nulls() {
    let mut employee = employee(1, "Ada");
    employee.created = None;
    let statement = compile(InsertContext::for_entity(metamodel::<Employee>(), &employee).unwrap());
    assert_eq!(statement.values().len(), 8);
    assert_eq!(statement.values()[5], Value::null(SqlType::Timestamp));
}

#[test]
fn update_for_entity_bumps_version() {
    let statement =
        compile(UpdateContext::for_entity(metamodel::<Employee>(), &employee(3, "Grace")).unwrap());
    assert_eq!(
        statement.text(),
        "UPDATE EMPLOYEE SET EMPLOYEE_NAME = ?, age = ?, street = ?, CITY = ?, updated = ?, \
         version = version + ? WHERE id = ? AND version = ?"
    );
    let values = statement.values();
    assert_eq!(values[5], Value::of(1_i64));
    assert_eq!(values[6], Value::of(3_i64));
    assert_eq!(values[7], Value::of(1_i64));
}

#[test]
fn update_where_requires_predicate_unless_configured() {
    let err = session()
        .update_where::<OrderLine>(|u| u.set("quantity", 0_i32), |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Compile(CompileError::MissingWhereClause {
            operation: "UPDATE",
            ..
        })
    ));

    let permissive = Session::new(QueryConfig {
        allow_missing_where: true,
        ..QueryConfig::default()
    });
    let statement = permissive
        .update_where::<OrderLine>(|u| u.set("quantity", 0_i32), |_| {})
        .unwrap();
    assert_eq!(statement.text(), "UPDATE sales.order_line SET quantity = ?");
}

#[test]
fn delete_where_with_criteria() {
    let statement = session()
        .delete_where::<OrderLine>(|c| {
            c.where_clause(|w| {
                w.eq("orderId", 7_i64);
                w.not(|w| {
                    w.eq("product", "bolt");
                });
            });
        })
        .unwrap();
    assert_eq!(
        statement.text(),
        "DELETE FROM sales.order_line WHERE order_id = ? AND NOT (product = ?)"
    );
}

#[test]
fn explicit_contexts_compose() {
    let criteria = Criteria::build(|c| {
        c.where_clause(|w| {
            w.lt("age", 18_i32);
        });
    })
    .unwrap();
    let statement = compile(SelectContext::new(metamodel::<Employee>(), criteria).distinct().count());
    assert_eq!(
        statement.text(),
        "SELECT COUNT(*) FROM (SELECT DISTINCT id, EMPLOYEE_NAME, age, street, CITY, created, \
         updated, version FROM EMPLOYEE WHERE age < ?) AS distinct_rows"
    );
    assert_eq!(statement.values(), &[Value::of(18_i32)]);
}

#[test]
fn limited_delete_is_rendered_or_rejected() {
    let declare = |c: &mut sqlscope_orm::criteria::CriteriaScope| {
        c.where_clause(|w| {
            w.eq("product", "bolt");
        });
        c.limit(|| 1);
    };

    let err = session().delete_where::<OrderLine>(declare).unwrap_err();
    assert!(matches!(
        err,
        QueryError::Compile(CompileError::UnsupportedPaging {
            operation: "DELETE",
            clause: "LIMIT",
            ..
        })
    ));
    assert_eq!(
        err.to_string(),
        "dialect `generic` cannot apply LIMIT to DELETE"
    );

    let mysql = Session::new(QueryConfig {
        dialect: DialectKind::MySql,
        ..QueryConfig::default()
    });
    let statement = mysql.delete_where::<OrderLine>(declare).unwrap();
    assert_eq!(
        statement.text(),
        "DELETE FROM sales.order_line WHERE product = ? LIMIT ?"
    );
    assert_eq!(statement.values(), &[Value::of("bolt"), Value::of(1_i64)]);
}

#[test]
fn paged_update_never_drops_the_offset() {
    let mysql = Session::new(QueryConfig {
        dialect: DialectKind::MySql,
        ..QueryConfig::default()
    });
    let err = mysql
        .update_where::<Employee>(
            |u| u.set("age", 0_i32),
            |c| {
                c.where_clause(|w| {
                    w.eq("age", 1_i32);
                });
                c.limit(|| 10).offset(|| 5);
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Compile(CompileError::UnsupportedPaging {
            operation: "UPDATE",
            dialect: "mysql",
            clause: "OFFSET",
        })
    ));
}
