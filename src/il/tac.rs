//! Three-Address Code

use std::fmt::{self, Display, Formatter};

use crate::listing::Listing;

pub type TacListing = Listing<TacInstr>;

/// A single TAC instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TacInstr {
    /// Assign a value to a name.
    Assign(Name, Value),
    /// Perform a binary operation, assigning its result to a name.
    Bin(Name, BinOp, Value, Value),
    /// Jump to a label if a value is false.
    IfFalse(Value, Label),
    /// Jump to a label.
    Goto(Label),
    /// A label which can be jumped to.
    Label(Label),
}
impl TacInstr {
    /// The name this instruction assigns to, if any.
    pub fn write(&self) -> Option<&Name> {
        match self {
            Self::Assign(t, _) => Some(t),
            Self::Bin(t, _, _, _) => Some(t),
            Self::IfFalse(_, _) => None,
            Self::Goto(_) => None,
            Self::Label(_) => None,
        }
    }
}
impl Display for TacInstr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Assign(target, value) => write!(f, "{} = {}", target, value),
            Self::Bin(target, op, lhs, rhs) => {
                write!(f, "{} = {} {} {}", target, lhs, op, rhs)
            }
            Self::IfFalse(value, lbl) => write!(f, "ifFalse {} goto {}", value, lbl),
            Self::Goto(label) => write!(f, "goto {}", label),
            Self::Label(lbl) => write!(f, "{}:", lbl),
        }
    }
}

/// A TAC name. Names are symbolic addresses and may represent variables of the source program
/// or temporaries (`t1`, `t2`, ...) holding intermediate values of nested expressions.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);
impl Name {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether `text` is spelled like an identifier: a letter or underscore followed by
    /// letters, digits and underscores.
    pub fn is_identifier(text: &str) -> bool {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    /// Parses an identifier, rejecting anything that is not spelled like one as well as the
    /// boolean literals.
    pub fn parse(text: &str) -> Option<Self> {
        (Self::is_identifier(text) && Literal::parse(text).is_none()).then(|| Self::new(text))
    }
}
impl Display for Name {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A jump target, `L<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(usize);
impl Label {
    pub fn new(subscript: usize) -> Self {
        Self(subscript)
    }

    /// Parses `L<digits>`. A leading zero is rejected, since `L01` would otherwise be read as
    /// the same label as `L1`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('L')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        digits.parse().ok().map(Self)
    }
}
impl Display for Label {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Lt,
    Le,
    Ge,
    Eq,
    Ne,
}
impl BinOp {
    pub const ALL: [BinOp; 10] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Gt,
        BinOp::Lt,
        BinOp::Le,
        BinOp::Ge,
        BinOp::Eq,
        BinOp::Ne,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}
impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A literal operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}
impl Literal {
    /// Parses a literal as it is spelled in TAC (`True`/`False`, `42`, `-3`, `2.5`).
    ///
    /// Integers that do not fit in an `i64` are read as decimals.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "True" => return Some(Literal::Bool(true)),
            "False" => return Some(Literal::Bool(false)),
            _ => (),
        }

        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (unsigned, None),
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) {
            return None;
        }
        match fraction {
            None => match text.parse() {
                Ok(int) => Some(Literal::Int(int)),
                Err(_) => Self::decimal(text),
            },
            Some(fraction) if all_digits(fraction) => Self::decimal(text),
            Some(_) => None,
        }
    }

    fn decimal(text: &str) -> Option<Self> {
        text.parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Literal::Float)
    }

    /// Parses a literal as the front end spells it, which additionally allows lowercase
    /// booleans.
    pub fn parse_atom(text: &str) -> Option<Self> {
        match text {
            "true" => Some(Literal::Bool(true)),
            "false" => Some(Literal::Bool(false)),
            other => Self::parse(other),
        }
    }
}
impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{}", i),
            // Keep a decimal point so the value reads back as a decimal.
            Literal::Float(x) if x.fract() == 0.0 => write!(f, "{:.1}", x),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
        }
    }
}

/// A TAC value. Values can be literals, or references to names.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(Literal),
    Name(Name),
}
impl Value {
    pub fn as_literal(&self) -> Option<Literal> {
        match self {
            Value::Literal(lit) => Some(*lit),
            Value::Name(_) => None,
        }
    }

    /// Parses a value spelled in TAC.
    pub fn parse(text: &str) -> Option<Self> {
        Literal::parse(text)
            .map(Value::Literal)
            .or_else(|| Name::parse(text).map(Value::Name))
    }
}
impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Literal(lit) => lit.fmt(f),
            Value::Name(name) => name.fmt(f),
        }
    }
}
impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        Value::Literal(value)
    }
}
impl From<Name> for Value {
    fn from(value: Name) -> Self {
        Value::Name(value)
    }
}
