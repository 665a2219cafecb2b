use crate::{
    prelude::*,
    sexpr::{self, Atom, Imbalance, Node},
};

use super::{
    error::{ConvertError, Reason},
    form::Form,
    label_generator::*,
    name_generator::*,
    tac::*,
};

/// Converts tree text into a three-address code listing.
pub fn convert(text: &str) -> Result<TacListing, ConvertError> {
    let tree = sexpr::read(text);

    match tree.imbalance {
        Some(Imbalance::UnmatchedClose(span)) => {
            return Err(ConvertError::new(span, Reason::UnmatchedClose))
        }
        Some(Imbalance::Unclosed(span)) => return Err(ConvertError::new(span, Reason::Unclosed)),
        Some(Imbalance::TooDeep(span)) => return Err(ConvertError::new(span, Reason::TooDeep)),
        None => (),
    }

    match tree.nodes.as_slice() {
        [program] => generate(program),
        _ => Err(ConvertError::whole_input(Reason::MissingMain)),
    }
}

/// Generates a three-address code listing for a `(main ...)` tree.
pub fn generate(program: &Node) -> Result<TacListing, ConvertError> {
    match program.as_list() {
        Some(main) if main.tag() == Some("main") => TacGenerator::generate(program),
        _ => Err(ConvertError::new(program.span(), Reason::MissingMain)),
    }
}

/// The result of lowering an expression.
enum Operand<'n> {
    Value(Value),
    /// A form with no TAC meaning, passed through untouched.
    Opaque(&'n Node),
}
impl<'n> Operand<'n> {
    fn into_value(self) -> Result<Value, ConvertError> {
        match self {
            Operand::Value(value) => Ok(value),
            Operand::Opaque(node) => Err(ConvertError::new(
                node.span(),
                Reason::NoValue(node.to_string()),
            )),
        }
    }
}

struct TacGenerator {
    listing: TacListing,
    name_generator: NameGenerator,
    label_generator: LabelGenerator,
}
impl TacGenerator {
    fn generate(program: &Node) -> Result<TacListing, ConvertError> {
        let mut tac = Self {
            listing: TacListing::new(),
            name_generator: NameGenerator::new(),
            label_generator: LabelGenerator::new(),
        };

        tac.lower_stmt(program)?;

        debug!("Generated {} instructions", tac.listing.len());
        Ok(tac.listing)
    }

    /// Lower a statement. Statements only matter for the instructions they emit.
    fn lower_stmt(&mut self, stmt: &Node) -> Result<(), ConvertError> {
        let Node::List(list) = stmt else {
            return Ok(());
        };
        if list.is_empty() {
            return Ok(());
        }

        match Form::classify(list)? {
            Form::Block(stmts) => {
                for stmt in stmts {
                    self.lower_stmt(stmt)?;
                }
            }
            Form::For {
                init,
                assign,
                cond,
                step,
                body,
            } => self.lower_for(init, assign, cond, step, body)?,
            Form::Declaration => (),
            _ => {
                self.lower_expr(stmt)?;
            }
        }
        Ok(())
    }

    /// Lower a `for` loop. The loop condition is re-evaluated at the top of every iteration,
    /// and the increment form runs after the body.
    fn lower_for(
        &mut self,
        init: &Node,
        assign: &Node,
        cond: &Node,
        step: &Node,
        body: &Node,
    ) -> Result<(), ConvertError> {
        self.lower_stmt(init)?;
        self.lower_expr(assign)?;

        let start_lbl = self.label_generator.next_label();
        let end_lbl = self.label_generator.next_label();

        self.emit(TacInstr::Label(start_lbl));
        let cond = self.lower_expr(cond)?.into_value()?;
        self.emit(TacInstr::IfFalse(cond, end_lbl));

        self.lower_stmt(body)?;
        self.lower_expr(step)?;

        self.emit(TacInstr::Goto(start_lbl));
        self.emit(TacInstr::Label(end_lbl));
        Ok(())
    }

    /// Lower an expression, returning the value that holds its result.
    fn lower_expr<'n>(&mut self, expr: &'n Node) -> Result<Operand<'n>, ConvertError> {
        let list = match expr {
            Node::Atom(atom) => return convert_atom(atom).map(Operand::Value),
            Node::List(list) => list,
        };

        let value = match Form::classify(list)? {
            Form::Assign { target, value } => self.lower_assign(target, value)?,
            Form::Binary { op, lhs, rhs } => self.lower_binexpr(op, lhs, rhs)?,
            Form::Increment { var } => self.lower_increment(var)?,
            Form::If {
                cond,
                then,
                otherwise,
            } => self.lower_if(cond, then, otherwise)?,
            Form::Block(_) | Form::For { .. } | Form::Declaration | Form::Other => {
                warn!("Passing `{}` through without generating code", expr);
                return Ok(Operand::Opaque(expr));
            }
        };

        Ok(Operand::Value(value))
    }

    /// Lower `(= target value)` to a single assignment. Returns the target.
    fn lower_assign(&mut self, target: &Node, value: &Node) -> Result<Value, ConvertError> {
        let target = assign_target(target)?;
        let value = self.lower_expr(value)?.into_value()?;

        self.emit(TacInstr::Assign(target.clone(), value));
        Ok(Value::Name(target))
    }

    fn lower_binexpr(&mut self, op: BinOp, lhs: &Node, rhs: &Node) -> Result<Value, ConvertError> {
        let lhs = self.lower_expr(lhs)?.into_value()?;
        let rhs = self.lower_expr(rhs)?.into_value()?;

        let res_name = self.name_generator.next_temp();
        self.emit(TacInstr::Bin(res_name.clone(), op, lhs, rhs));

        Ok(Value::Name(res_name))
    }

    /// Lower `(++ ... var)` by adding one to `var` through a temporary.
    ///
    /// Only the last element of the form is incremented, and it has to be a plain name.
    /// Anything before it (the loop condition, when this is the step of a `for`) is ignored.
    fn lower_increment(&mut self, var: &Node) -> Result<Value, ConvertError> {
        let var = assign_target(var)?;

        let temp = self.name_generator.next_temp();
        self.emit(TacInstr::Bin(
            temp.clone(),
            BinOp::Add,
            Value::Name(var.clone()),
            Value::Literal(Literal::Int(1)),
        ));
        self.emit(TacInstr::Assign(var.clone(), Value::Name(temp)));

        Ok(Value::Name(var))
    }

    /// Lower `(if cond then [else])` into a value-producing conditional.
    ///
    /// Both branches are lowered before the condition, so any instructions they emit end up
    /// ahead of the jump and run unconditionally. Only the assignment of each branch's value
    /// to the result temporary is guarded by the test.
    fn lower_if(
        &mut self,
        cond: &Node,
        then: &Node,
        otherwise: Option<&Node>,
    ) -> Result<Value, ConvertError> {
        let then_value = self.lower_expr(then)?;
        let else_value = otherwise.map(|node| self.lower_expr(node)).transpose()?;

        let result = self.name_generator.next_temp();
        let false_lbl = self.label_generator.next_label();
        let end_lbl = self.label_generator.next_label();

        let cond = self.lower_expr(cond)?.into_value()?;
        self.emit(TacInstr::IfFalse(cond, false_lbl));
        self.emit(TacInstr::Assign(result.clone(), then_value.into_value()?));
        self.emit(TacInstr::Goto(end_lbl));
        self.emit(TacInstr::Label(false_lbl));
        if let Some(else_value) = else_value {
            self.emit(TacInstr::Assign(result.clone(), else_value.into_value()?));
        }
        self.emit(TacInstr::Label(end_lbl));

        Ok(Value::Name(result))
    }

    /// Emit an instruction, adding it to the listing.
    fn emit(&mut self, instr: TacInstr) {
        trace!("Emit {}", instr);
        self.listing.push(instr);
    }
}

/// Convert an atom to a [`Value`]. This does not result in the emission of intermediate code.
fn convert_atom(atom: &Atom) -> Result<Value, ConvertError> {
    Literal::parse_atom(&atom.text)
        .map(Value::Literal)
        .or_else(|| Name::parse(&atom.text).map(Value::Name))
        .ok_or_else(|| ConvertError::new(atom.span, Reason::NotAnIdentifier(atom.text.clone())))
}

/// The name an assignment or increment writes to.
fn assign_target(node: &Node) -> Result<Name, ConvertError> {
    match node {
        Node::Atom(atom) if Literal::parse_atom(&atom.text).is_none() => Name::parse(&atom.text)
            .ok_or_else(|| ConvertError::new(atom.span, Reason::NotAssignable(atom.text.clone()))),
        other => Err(ConvertError::new(
            other.span(),
            Reason::NotAssignable(other.to_string()),
        )),
    }
}
