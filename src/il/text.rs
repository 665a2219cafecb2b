//! The canonical text encoding of TAC.
//!
//! Every instruction has exactly one spelling, produced by its [`Display`](std::fmt::Display)
//! implementation. Reading text back in only accepts those five shapes:
//! ```text
//! x = v
//! x = v op v
//! ifFalse v goto L1
//! goto L1
//! L1:
//! ```
//! Whitespace around `=` and operators is optional, so `t1=a+b` reads the same as `t1 = a + b`.
use crate::{listing::Position, sexpr::char_lexer::CharLexer};

use super::{error::TextError, tac::*};

/// Renders a listing as text, one instruction per line. Removed instructions are skipped.
pub fn render(listing: &TacListing) -> String {
    listing
        .iter_instructions()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads TAC text back into a listing. Blank lines are skipped and do not count towards
/// instruction positions.
pub fn parse_tac(text: &str) -> Result<TacListing, TextError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(idx, line)| parse_line(line).ok_or_else(|| TextError::new(Position(idx), line)))
        .collect()
}

/// Parses a single, already trimmed line.
pub fn parse_line(line: &str) -> Option<TacInstr> {
    let words = words(line);
    let words: Vec<&str> = words.iter().map(String::as_str).collect();

    match words.as_slice() {
        [label] => label
            .strip_suffix(':')
            .and_then(Label::parse)
            .map(TacInstr::Label),
        ["ifFalse", cond, "goto", label] => Some(TacInstr::IfFalse(
            Value::parse(cond)?,
            Label::parse(label)?,
        )),
        ["goto", label] => Some(TacInstr::Goto(Label::parse(label)?)),
        [target, "=", value] => Some(TacInstr::Assign(Name::parse(target)?, Value::parse(value)?)),
        [target, "=", lhs, op, rhs] => Some(TacInstr::Bin(
            Name::parse(target)?,
            BinOp::from_symbol(op)?,
            Value::parse(lhs)?,
            Value::parse(rhs)?,
        )),
        _ => None,
    }
}

fn is_operator(ch: &char) -> bool {
    matches!(ch, '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/')
}

/// Splits a line into words. `=` and operators are words of their own. A `-` directly in
/// front of a digit starts a negative number when it follows `ifFalse`, `=` or another
/// operator.
fn words(line: &str) -> Vec<String> {
    let mut lexer = CharLexer::new(line);
    let mut words: Vec<String> = vec![];

    loop {
        lexer.consume_while(|c| c.is_whitespace());
        let Some(ch) = lexer.peek() else {
            break;
        };

        let expects_value = words
            .last()
            .map_or(true, |word| word == "ifFalse" || word.chars().all(|c| is_operator(&c)));
        let negative = ch == '-' && expects_value && {
            let mut ahead = lexer.clone();
            ahead.try_next();
            ahead.peek().map_or(false, |c| c.is_ascii_digit())
        };

        let word = if is_operator(&ch) && !negative {
            operator(&mut lexer)
        } else {
            let mut word = String::new();
            if negative {
                lexer.try_next();
                word.push('-');
            }
            word.push_str(&lexer.consume_while(|c| !c.is_whitespace() && !is_operator(c)));
            word
        };
        words.push(word);
    }
    words
}

/// Consumes a one or two character operator.
fn operator(lexer: &mut CharLexer) -> String {
    let mut op = String::new();
    if let Some(first) = lexer.try_next() {
        op.push(first);
        if matches!(first, '<' | '>' | '=' | '!') && lexer.peek() == Some('=') {
            lexer.try_next();
            op.push('=');
        }
    }
    op
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::il::convert;

    #[test]
    fn all_five_shapes_are_recognised() {
        let listing = parse_tac("x = 5\nt1 = x <= 1.5\nifFalse t1 goto L1\ngoto L2\nL1:").unwrap();
        assert_eq!(
            vec![
                TacInstr::Assign(Name::new("x"), Value::Literal(Literal::Int(5))),
                TacInstr::Bin(
                    Name::new("t1"),
                    BinOp::Le,
                    Value::Name(Name::new("x")),
                    Value::Literal(Literal::Float(1.5))
                ),
                TacInstr::IfFalse(Value::Name(Name::new("t1")), Label::new(1)),
                TacInstr::Goto(Label::new(2)),
                TacInstr::Label(Label::new(1)),
            ],
            listing.into_vec()
        );
    }

    #[test]
    fn literal_conditions_are_accepted() {
        assert_eq!(
            Some(TacInstr::IfFalse(Value::Literal(Literal::Bool(true)), Label::new(1))),
            parse_line("ifFalse True goto L1")
        );
    }

    #[test]
    fn blank_lines_and_padding_are_ignored() {
        let listing = parse_tac("\n   x = 1   \n\n\ty = x\n").unwrap();
        assert_eq!(2, listing.len());
    }

    #[test]
    fn unknown_shapes_are_rejected_with_their_line() {
        let error = parse_tac("x = 1\nx = 1 % 2").unwrap_err();
        assert_eq!(Position(1), error.position());
        assert_eq!("x = 1 % 2", error.line());
        assert_eq!(
            "could not parse instruction on line 2: `x = 1 % 2`",
            error.to_string()
        );
    }

    #[test]
    fn malformed_lines() {
        for line in [
            "goto x",
            "ifFalse x goto",
            "if x goto L1",
            "x := 1",
            "5 = x",
            "True = x",
            "x = 1 +",
            "L1",
            "x:",
            "x = 1 2 3",
        ] {
            assert_eq!(None, parse_line(line), "{line}");
        }
    }

    #[test]
    fn operators_need_no_surrounding_whitespace() {
        assert_eq!(
            Some(TacInstr::Assign(Name::new("x"), Value::Literal(Literal::Int(5)))),
            parse_line("x=5")
        );
        assert_eq!(parse_line("t1 = a + b"), parse_line("t1=a+b"));
        assert_eq!(parse_line("t2 = i <= 10"), parse_line("t2=i<=10"));
        assert_eq!(parse_line("x = a - b"), parse_line("x = a-b"));
        assert_eq!(
            Some(TacInstr::Assign(Name::new("x"), Value::Literal(Literal::Int(-3)))),
            parse_line("x=-3")
        );
        assert_eq!(
            Some(TacInstr::Bin(
                Name::new("t1"),
                BinOp::Sub,
                Value::Name(Name::new("a")),
                Value::Literal(Literal::Int(-3))
            )),
            parse_line("t1 = a - -3")
        );
        assert_eq!(
            Some(TacInstr::IfFalse(Value::Literal(Literal::Int(-1)), Label::new(2))),
            parse_line("ifFalse -1 goto L2")
        );
    }

    #[test]
    fn leading_zero_labels_are_rejected() {
        let error = parse_tac("goto L01\nL1:").unwrap_err();
        assert_eq!(Position(0), error.position());
    }

    #[test]
    fn emitter_output_reads_back_identically() {
        let source = "(main (Dc int i) (= s 0) \
            (for (stmt) (= i 0) (++ (<= i 10) i) (stmt (= s (+ s (if (> i 5) (* i 2.5) true))))))";
        let listing = convert(source).unwrap();
        let reparsed = parse_tac(&render(&listing)).unwrap();

        assert_eq!(listing.into_vec(), reparsed.into_vec());
    }
}
