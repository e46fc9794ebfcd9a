//! Parser for the polynomial text notation.
//!
//! ```text
//! polynomial := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := number | 'x[' index ']' ('^' number)?
//! ```
//!
//! `/` before a variable negates its exponent, `/` before a number divides the
//! coefficient, and `-` between terms negates the following term. Whitespace is
//! ignored.
//!
//! ```
//! let p = polymin::parse_polynomial("x[1]^2*x[2] + 3").unwrap();
//! assert_eq!(p.terms().len(), 2);
//! assert_eq!(p.value(&[2.0, 5.0]), 23.0);
//! ```

use std::collections::BTreeMap;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{AlgebraError, Result};
use crate::polynomial::Polynomial;
use crate::term::Term;

#[derive(Parser)]
#[grammar = "polynomial.pest"]
struct PolynomialParser;

const FRAGMENT_LEN: usize = 24;

/// Parse a polynomial. Malformed input is an [`AlgebraError::Parse`] carrying
/// the offending fragment; nothing is silently coerced.
pub fn parse_polynomial(input: &str) -> Result<Polynomial> {
    let root = PolynomialParser::parse(Rule::polynomial, input)
        .map_err(|e| syntax_error(input, &e))?
        .next()
        .ok_or_else(|| parse_error(input, "empty input"))?;

    let mut terms = Vec::new();
    let mut negate_next = false;
    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::add_op => negate_next = pair.as_str() == "-",
            Rule::term => {
                let term = build_term(pair)?;
                terms.push(if negate_next { term.negate() } else { term });
            }
            _ => {}
        }
    }
    Ok(Polynomial::new(terms))
}

fn build_term(pair: Pair<'_, Rule>) -> Result<Term> {
    let mut coefficient = 1.0;
    // Repeated variables add their exponents.
    let mut exponents: BTreeMap<usize, f64> = BTreeMap::new();
    let mut divide = false;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::mul_op => divide = part.as_str() == "/",
            Rule::factor => {
                let fragment = part.as_str();
                let mut inner = part.into_inner();
                let Some(first) = inner.next() else {
                    return Err(parse_error(fragment, "empty factor"));
                };
                match first.as_rule() {
                    Rule::number => {
                        let value = parse_number(first)?;
                        if divide {
                            if value == 0.0 {
                                return Err(parse_error(fragment, "division by zero"));
                            }
                            coefficient /= value;
                        } else {
                            coefficient *= value;
                        }
                    }
                    Rule::variable => {
                        let index = parse_index(first)?;
                        let mut exponent = match inner.next() {
                            Some(p) => parse_number(p)?,
                            None => 1.0,
                        };
                        if divide {
                            exponent = -exponent;
                        }
                        *exponents.entry(index).or_insert(0.0) += exponent;
                    }
                    _ => return Err(parse_error(fragment, "variable or number expected")),
                }
            }
            _ => {}
        }
    }

    let (Some(&lo), Some(&hi)) = (exponents.keys().next(), exponents.keys().next_back()) else {
        return Ok(Term::constant(coefficient));
    };
    let powers: Vec<f64> = (lo..=hi)
        .map(|v| exponents.get(&v).copied().unwrap_or(0.0))
        .collect();
    Ok(Term::trimmed(coefficient, lo, &powers))
}

fn parse_number(pair: Pair<'_, Rule>) -> Result<f64> {
    let text = pair.as_str();
    let value = text
        .parse::<f64>()
        .map_err(|e| parse_error(text, &format!("invalid number: {}", e)))?;
    if !value.is_finite() {
        return Err(parse_error(text, "number out of range"));
    }
    Ok(value)
}

fn parse_index(variable: Pair<'_, Rule>) -> Result<usize> {
    let text = variable.as_str();
    let index = variable
        .into_inner()
        .next()
        .ok_or_else(|| parse_error(text, "variable index expected"))?
        .as_str();
    let index: usize = index
        .parse()
        .map_err(|e| parse_error(text, &format!("invalid variable index: {}", e)))?;
    if index == 0 {
        return Err(parse_error(text, "variable indices start at 1"));
    }
    Ok(index)
}

fn parse_error(fragment: &str, message: &str) -> AlgebraError {
    AlgebraError::Parse {
        fragment: fragment.chars().take(FRAGMENT_LEN).collect(),
        message: message.to_string(),
    }
}

fn syntax_error(input: &str, err: &pest::error::Error<Rule>) -> AlgebraError {
    let pos = match err.location {
        pest::error::InputLocation::Pos(p) => p,
        pest::error::InputLocation::Span((start, _)) => start,
    };
    let fragment = input.get(pos..).unwrap_or_default();
    let fragment = if fragment.is_empty() {
        "<end of input>"
    } else {
        fragment
    };
    parse_error(fragment, &err.variant.message())
}
