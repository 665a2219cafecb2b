//! Intermediate code generation and optimisation.

mod audit;
mod binding;
mod error;
mod fold;
mod form;
mod generator;
mod label_generator;
mod name_generator;
mod optimiser;
mod tac;
mod text;

pub use audit::{Action, BindingKind, LogEntry, OptimisationLog};
pub use binding::{mutable_names, Binding, Bindings};
pub use error::{ConvertError, Reason, TextError};
pub use fold::fold;
pub use generator::{convert, generate};
pub use optimiser::{optimise, Optimised};
pub use tac::*;
pub use text::{parse_line, parse_tac, render};
