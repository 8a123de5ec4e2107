//! Tests for INSERT and DELETE inversion.

mod common;
use common::*;

use flashback_sql_core::{Clause, Mode, RewriteError};

// ===================================================================
// INSERT -> DELETE
// ===================================================================

#[test]
fn insert_flashback_example() {
    assert_eq!(
        flashback("INSERT INTO t (`id`,`name`) VALUES (5,`x`);"),
        "DELETE FROM t WHERE `id`=5 AND `name`=`x`;"
    );
}

#[test]
fn insert_binlog2sql_line() {
    assert_eq!(
        flashback(
            "INSERT INTO `test`.`user`(`id`, `name`, `age`) VALUES (3, 'carol', 30); \
             #start 4 end 388 time 2024-01-02 00:00:00"
        ),
        "DELETE FROM `test`.`user` WHERE `id`=3 AND `name`='carol' AND `age`=30; \
         #start 4 end 388 time 2024-01-02 00:00:00"
    );
}

#[test]
fn insert_full_flashback_also_inverts() {
    assert_eq!(
        full_flashback("INSERT INTO t (`id`) VALUES (1);"),
        "DELETE FROM t WHERE `id`=1;"
    );
}

#[test]
fn insert_filter_mode_passes_through() {
    assert_eq!(
        filter("  INSERT INTO t (`id`) VALUES (1);  "),
        "INSERT INTO t (`id`) VALUES (1);"
    );
}

#[test]
fn insert_value_with_comma_in_string() {
    assert_eq!(
        flashback("INSERT INTO t (`id`, `name`) VALUES (1, 'Smith, John');"),
        "DELETE FROM t WHERE `id`=1 AND `name`='Smith, John';"
    );
}

#[test]
fn insert_without_values_is_fatal() {
    let err = rewrite_err("INSERT INTO t SELECT * FROM s;", Mode::Flashback);
    assert!(matches!(err, RewriteError::MalformedInsert { .. }));
}

// ===================================================================
// DELETE -> INSERT
// ===================================================================

#[test]
fn delete_flashback_example() {
    assert_eq!(
        flashback("DELETE FROM t WHERE `id`=5 AND `name`=`x` LIMIT 1;"),
        "INSERT INTO t (`id`, `name`) VALUES (5, `x`);"
    );
}

#[test]
fn delete_binlog2sql_line() {
    assert_eq!(
        flashback(
            "DELETE FROM `test`.`user` WHERE `id`=3 AND `name`='carol' AND `age`=30 \
             LIMIT 1; #start 4 end 388 time 2024-01-02 00:00:00"
        ),
        "INSERT INTO `test`.`user` (`id`, `name`, `age`) VALUES (3, 'carol', 30); \
         #start 4 end 388 time 2024-01-02 00:00:00"
    );
}

#[test]
fn delete_json_value() {
    assert_eq!(
        flashback(r#"DELETE FROM t WHERE `id`=1 AND `doc`='{"a": 1, "b": 2}' LIMIT 1;"#),
        r#"INSERT INTO t (`id`, `doc`) VALUES (1, '{"a": 1, "b": 2}');"#
    );
}

#[test]
fn delete_filter_mode_passes_through() {
    assert_eq!(
        filter("DELETE FROM t WHERE `id`=5 LIMIT 1;"),
        "DELETE FROM t WHERE `id`=5 LIMIT 1;"
    );
}

#[test]
fn delete_range_predicate_is_fatal() {
    let err = rewrite_err("DELETE FROM t WHERE `id`>5 LIMIT 1;", Mode::Flashback);
    assert_eq!(
        err,
        RewriteError::MalformedPredicate {
            predicate: "`id`>5".to_string(),
            statement: "DELETE FROM t WHERE `id`>5 LIMIT 1;".to_string(),
        }
    );
}

#[test]
fn delete_without_from_is_fatal() {
    let err = rewrite_err("DELETE t WHERE `id`=5;", Mode::Flashback);
    assert!(matches!(
        err,
        RewriteError::MissingClause {
            clause: Clause::From,
            ..
        }
    ));
}
