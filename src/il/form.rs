//! Classification of tree lists by their leading tag.
use crate::sexpr::{List, Node};

use super::{
    error::{ConvertError, Reason},
    BinOp,
};

/// A list node, recognised by its tag and checked for the number of elements it needs.
#[derive(Debug)]
pub enum Form<'n> {
    /// `(= target value)`
    Assign { target: &'n Node, value: &'n Node },
    /// `(op lhs rhs)`
    Binary {
        op: BinOp,
        lhs: &'n Node,
        rhs: &'n Node,
    },
    /// `(++ ... var)`. Only the last element is looked at.
    Increment { var: &'n Node },
    /// `(if cond then [else])`
    If {
        cond: &'n Node,
        then: &'n Node,
        otherwise: Option<&'n Node>,
    },
    /// `(main stmt...)` or `(stmt stmt...)`
    Block(&'n [Node]),
    /// `(for init assign (++ cond var) body)`. The loop condition is the first argument of the
    /// increment form.
    For {
        init: &'n Node,
        assign: &'n Node,
        cond: &'n Node,
        step: &'n Node,
        body: &'n Node,
    },
    /// `(Dc ...)`
    Declaration,
    /// Anything else, including empty lists and lists that do not start with an atom.
    Other,
}

impl<'n> Form<'n> {
    pub fn classify(list: &'n List) -> Result<Self, ConvertError> {
        let Some(tag) = list.tag() else {
            return Ok(Form::Other);
        };
        let items = list.items.as_slice();

        let form = match tag {
            "=" => {
                let [_, target, value] = exact::<3>(list, items, "3")?;
                Form::Assign { target, value }
            }
            "++" => match items {
                [_, .., var] => Form::Increment { var },
                _ => return Err(arity(list, tag, "at least 2")),
            },
            "if" => match items {
                [_, cond, then] => Form::If {
                    cond,
                    then,
                    otherwise: None,
                },
                [_, cond, then, otherwise] => Form::If {
                    cond,
                    then,
                    otherwise: Some(otherwise),
                },
                _ => return Err(arity(list, tag, "3 or 4")),
            },
            "main" | "stmt" => Form::Block(list.args()),
            "for" => {
                let [_, init, assign, step, body] = items else {
                    return Err(ConvertError::new(list.span, Reason::ForShape));
                };
                let cond = match step {
                    Node::List(inc) if inc.tag() == Some("++") && inc.len() == 3 => &inc.items[1],
                    _ => return Err(ConvertError::new(step.span(), Reason::ForShape)),
                };
                Form::For {
                    init,
                    assign,
                    cond,
                    step,
                    body,
                }
            }
            "Dc" => Form::Declaration,
            other => match BinOp::from_symbol(other) {
                Some(op) => {
                    let [_, lhs, rhs] = exact::<3>(list, items, "3")?;
                    Form::Binary { op, lhs, rhs }
                }
                None => Form::Other,
            },
        };

        Ok(form)
    }
}

fn exact<'n, const N: usize>(
    list: &List,
    items: &'n [Node],
    expected: &'static str,
) -> Result<&'n [Node; N], ConvertError> {
    items
        .try_into()
        .map_err(|_| arity(list, list.tag().unwrap_or_default(), expected))
}

fn arity(list: &List, tag: &str, expected: &'static str) -> ConvertError {
    ConvertError::new(
        list.span,
        Reason::Arity {
            form: tag.to_string(),
            expected,
            found: list.len(),
        },
    )
}
