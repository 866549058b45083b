use chrono::NaiveDate;

use crate::models::TaskStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    And,
    Or,
}

/// Filter AST built by the CLI query parser and compiled to SQL by the
/// repository's query builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches everything (empty query string).
    All,
    Filter(Filter),
    Not(Box<Query>),
    Binary {
        op: Operator,
        left: Box<Query>,
        right: Box<Query>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Element(String),
    Status(TaskStatus),
    Name(String),
    Due(DueFilter),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DueFilter {
    Today,
    Tomorrow,
    Overdue,
    On(NaiveDate),
}
