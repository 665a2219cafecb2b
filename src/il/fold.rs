//! Compile-time evaluation of binary operations on literals.
use std::cmp::Ordering;

use crate::prelude::*;

use super::{BinOp, Literal};

/// Evaluates `lhs op rhs`. Returns [`None`] when the operation should not be folded: division
/// by zero, integer overflow, or a result that is not a finite number.
///
/// Booleans take part as `1` and `0`. Arithmetic stays in integers while both operands are
/// integers; division of integers only stays an integer when it is exact.
pub fn fold(op: BinOp, lhs: Literal, rhs: Literal) -> Option<Literal> {
    let lhs = Number::from(lhs);
    let rhs = Number::from(rhs);

    let result = match op {
        BinOp::Add => arith(lhs, rhs, i64::checked_add, |a, b| a + b),
        BinOp::Sub => arith(lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinOp::Mul => arith(lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinOp::Div => divide(lhs, rhs),
        cmp => compare(lhs, rhs).map(|ord| Literal::Bool(holds(cmp, ord))),
    };

    if result.is_none() {
        trace!("Not folding {:?} {} {:?}", lhs, op, rhs);
    }
    result
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}
impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(x) => x == 0.0,
        }
    }
}
impl From<Literal> for Number {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Int(i) => Number::Int(i),
            Literal::Float(x) => Number::Float(x),
            Literal::Bool(b) => Number::Int(b as i64),
        }
    }
}

fn finite(x: f64) -> Option<Literal> {
    x.is_finite().then_some(Literal::Float(x))
}

fn arith(
    lhs: Number,
    rhs: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Literal> {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => int_op(a, b).map(Literal::Int),
        _ => finite(float_op(lhs.as_f64(), rhs.as_f64())),
    }
}

fn divide(lhs: Number, rhs: Number) -> Option<Literal> {
    if rhs.is_zero() {
        return None;
    }
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => match a.checked_rem(b)? {
            0 => a.checked_div(b).map(Literal::Int),
            _ => finite(a as f64 / b as f64),
        },
        _ => finite(lhs.as_f64() / rhs.as_f64()),
    }
}

fn compare(lhs: Number, rhs: Number) -> Option<Ordering> {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
        _ => lhs.as_f64().partial_cmp(&rhs.as_f64()),
    }
}

fn holds(op: BinOp, ord: Ordering) -> bool {
    match op {
        BinOp::Gt => ord == Ordering::Greater,
        BinOp::Lt => ord == Ordering::Less,
        BinOp::Le => ord != Ordering::Greater,
        BinOp::Ge => ord != Ordering::Less,
        BinOp::Eq => ord == Ordering::Equal,
        BinOp::Ne => ord != Ordering::Equal,
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
            unreachable!("{op} is not a comparison")
        }
    }
}
