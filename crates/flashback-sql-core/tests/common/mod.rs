#![allow(dead_code)]

use flashback_sql_core::{ColumnSplitter, Diagnostic, Mode, RewriteConfig, RewriteError, Rewriter};

pub fn rewrite_with(config: RewriteConfig, sql: &str, mode: Mode) -> (String, Vec<Diagnostic>) {
    let mut sink: Vec<Diagnostic> = Vec::new();
    let out = Rewriter::new(config)
        .rewrite(sql, mode, &mut sink)
        .unwrap_or_else(|e| panic!("Failed to rewrite: {sql}\nError: {e:?}"));
    (out.sql, sink)
}

pub fn rewrite_err(sql: &str, mode: Mode) -> RewriteError {
    Rewriter::default()
        .rewrite(sql, mode, &mut Vec::<Diagnostic>::new())
        .expect_err(&format!("Expected rewrite error for: {sql}"))
}

pub fn filter(sql: &str) -> String {
    rewrite_with(RewriteConfig::default(), sql, Mode::Filter).0
}

pub fn flashback(sql: &str) -> String {
    rewrite_with(RewriteConfig::default(), sql, Mode::Flashback).0
}

pub fn full_flashback(sql: &str) -> String {
    rewrite_with(RewriteConfig::default(), sql, Mode::FullFlashback).0
}

/// Splits a rewritten UPDATE into its `SET` and `WHERE` column texts.
pub fn update_clauses(sql: &str) -> (Vec<String>, Vec<String>) {
    let body = sql.trim_end_matches(';');
    let (set_side, where_side) = body
        .split_once(" WHERE ")
        .unwrap_or_else(|| panic!("No WHERE in: {sql}"));
    let (_, set) = set_side
        .split_once(" SET ")
        .unwrap_or_else(|| panic!("No SET in: {sql}"));
    let set = ColumnSplitter::new(",")
        .split(set)
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let filter = ColumnSplitter::where_clause()
        .split(where_side)
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (set, filter)
}
