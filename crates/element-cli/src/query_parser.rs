use std::str::FromStr;

use chrono::NaiveDate;
use pest::iterators::Pairs;
use pest::pratt_parser::PrattParser;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use element_core::models::TaskStatus;
use element_core::query::{DueFilter, Filter, Operator, Query};

#[derive(Parser)]
#[grammar = "filter.pest"]
pub struct FilterParser;

lazy_static::lazy_static! {
    static ref PRATT_PARSER: PrattParser<Rule> = {
        use pest::pratt_parser::{Assoc::*, Op};
        use Rule::*;

        PrattParser::new()
            .op(Op::infix(or, Left))
            .op(Op::infix(and, Left))
            .op(Op::prefix(not))
    };
}

#[derive(Error, Debug)]
pub enum QueryParseError {
    #[error("Pest parsing error: {0}")]
    Pest(#[from] Box<pest::error::Error<Rule>>),
    #[error("Invalid filter expression: {0}")]
    InvalidFilter(String),
    #[error("Unknown rule: {0:?}")]
    UnknownRule(Rule),
    #[error("Invalid status value: {0}")]
    InvalidStatus(String),
    #[error("Invalid due value: {0}. Use today, tomorrow, overdue, or a YYYY-MM-DD date.")]
    InvalidDue(String),
}

fn build_ast(pairs: Pairs<Rule>) -> Result<Query, QueryParseError> {
    PRATT_PARSER
        .map_primary(|primary| match primary.as_rule() {
            Rule::filter_expression => {
                let mut inner = primary.into_inner();
                let key = inner
                    .next()
                    .ok_or_else(|| QueryParseError::InvalidFilter("missing key".to_string()))?
                    .as_str();
                let value = inner
                    .next()
                    .ok_or_else(|| QueryParseError::InvalidFilter("missing value".to_string()))?
                    .as_str()
                    .trim_matches('"');

                let filter = match key {
                    "element" => Filter::Element(value.to_string()),
                    "name" => Filter::Name(value.to_string()),
                    "status" => {
                        let status = TaskStatus::from_str(value)
                            .map_err(|_| QueryParseError::InvalidStatus(value.to_string()))?;
                        Filter::Status(status)
                    }
                    "due" => Filter::Due(parse_due_value(value)?),
                    _ => {
                        return Err(QueryParseError::InvalidFilter(format!(
                            "Unknown filter key: {}",
                            key
                        )))
                    }
                };
                Ok(Query::Filter(filter))
            }
            Rule::expression => build_ast(primary.into_inner()),
            rule => Err(QueryParseError::UnknownRule(rule)),
        })
        .map_prefix(|op, rhs| {
            let op_rule = op.as_rule();
            match op_rule {
                Rule::not => Ok(Query::Not(Box::new(rhs?))),
                _ => Err(QueryParseError::UnknownRule(op_rule)),
            }
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::and => Operator::And,
                Rule::or => Operator::Or,
                rule => return Err(QueryParseError::UnknownRule(rule)),
            };
            Ok(Query::Binary {
                op,
                left: Box::new(lhs?),
                right: Box::new(rhs?),
            })
        })
        .parse(pairs)
}

fn parse_due_value(value: &str) -> Result<DueFilter, QueryParseError> {
    match value.to_lowercase().as_str() {
        "today" => Ok(DueFilter::Today),
        "tomorrow" => Ok(DueFilter::Tomorrow),
        "overdue" => Ok(DueFilter::Overdue),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map(DueFilter::On)
            .map_err(|_| QueryParseError::InvalidDue(value.to_string())),
    }
}

pub fn parse_query(input: &str) -> Result<Query, QueryParseError> {
    if input.trim().is_empty() {
        return Ok(Query::All);
    }

    let mut query_pairs = FilterParser::parse(Rule::filter_query, input).map_err(Box::new)?;
    let expression = query_pairs
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(|| QueryParseError::InvalidFilter(input.to_string()))?;
    build_ast(expression.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(parse_query("").unwrap(), Query::All);
        assert_eq!(parse_query("   ").unwrap(), Query::All);
    }

    #[test]
    fn single_filter() {
        assert_eq!(
            parse_query("element:Work").unwrap(),
            Query::Filter(Filter::Element("Work".to_string()))
        );
        assert_eq!(
            parse_query("status:pending").unwrap(),
            Query::Filter(Filter::Status(TaskStatus::Pending))
        );
        assert_eq!(
            parse_query("due:today").unwrap(),
            Query::Filter(Filter::Due(DueFilter::Today))
        );
    }

    #[test]
    fn quoted_values_keep_spaces() {
        assert_eq!(
            parse_query("element:\"Deep Focus\"").unwrap(),
            Query::Filter(Filter::Element("Deep Focus".to_string()))
        );
    }

    #[test]
    fn due_accepts_iso_dates() {
        assert_eq!(
            parse_query("due:2025-09-01").unwrap(),
            Query::Filter(Filter::Due(DueFilter::On(
                NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
            )))
        );
    }

    #[test]
    fn boolean_operators_and_parens() {
        let query = parse_query("status:pending and (element:Work or due:today)").unwrap();
        match query {
            Query::Binary {
                op: Operator::And,
                left,
                right,
            } => {
                assert_eq!(*left, Query::Filter(Filter::Status(TaskStatus::Pending)));
                assert!(matches!(
                    *right,
                    Query::Binary {
                        op: Operator::Or,
                        ..
                    }
                ));
            }
            other => panic!("Unexpected AST: {:?}", other),
        }
    }

    #[test]
    fn not_prefix() {
        let query = parse_query("not element:Work").unwrap();
        assert_eq!(
            query,
            Query::Not(Box::new(Query::Filter(Filter::Element("Work".to_string()))))
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(parse_query("flavor:sour").is_err());
    }

    #[test]
    fn invalid_due_value_is_rejected() {
        assert!(parse_query("due:someday").is_err());
    }
}
