use crate::query::{DueFilter, Filter, Operator, Query};
use sqlx::{QueryBuilder, Sqlite};

/// Utility functions for building SQL queries from our AST
pub struct SqlQueryBuilder;

impl SqlQueryBuilder {
    /// Build a SQL WHERE clause from a Query AST. Assumes the surrounding
    /// statement aliases tasks as `t` and elements as `e`.
    pub fn build_sql_where_clause(query: &Query, qb: &mut QueryBuilder<'_, Sqlite>) {
        match query {
            Query::All => {
                qb.push("1 = 1");
            }
            Query::Filter(filter) => match filter {
                Filter::Element(name) => {
                    qb.push("e.name = ");
                    qb.push_bind(name.clone());
                }
                Filter::Status(status) => {
                    qb.push("t.status = ");
                    qb.push_bind(status.clone());
                }
                Filter::Name(text) => {
                    qb.push("LOWER(t.name) LIKE LOWER(");
                    let mut pattern = String::with_capacity(text.len() + 2);
                    pattern.push('%');
                    pattern.push_str(text);
                    pattern.push('%');
                    qb.push_bind(pattern);
                    qb.push(")");
                }
                Filter::Due(due) => Self::build_due_clause(due, qb),
            },
            Query::Not(query) => {
                qb.push("NOT (");
                Self::build_sql_where_clause(query, qb);
                qb.push(")");
            }
            Query::Binary { op, left, right } => {
                qb.push("(");
                Self::build_sql_where_clause(left, qb);
                match op {
                    Operator::And => qb.push(") AND ("),
                    Operator::Or => qb.push(") OR ("),
                };
                Self::build_sql_where_clause(right, qb);
                qb.push(")");
            }
        }
    }

    fn build_due_clause(due: &DueFilter, qb: &mut QueryBuilder<'_, Sqlite>) {
        match due {
            DueFilter::Today => {
                qb.push("t.due_on = DATE('now')");
            }
            DueFilter::Tomorrow => {
                qb.push("t.due_on = DATE('now', '+1 day')");
            }
            DueFilter::Overdue => {
                qb.push("t.due_on < DATE('now') AND t.status = 'pending'");
            }
            DueFilter::On(date) => {
                qb.push("t.due_on = ");
                qb.push_bind(*date);
            }
        }
    }
}
