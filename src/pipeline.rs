//! The stages chained together: tree text in, TAC text out.
use thiserror::Error;

use crate::{
    error::{Location, PositionalError},
    il::{self, ConvertError, OptimisationLog, TextError},
    prelude::*,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Text(#[from] TextError),
}

impl PositionalError for PipelineError {
    fn location(&self) -> Location {
        match self {
            PipelineError::Convert(e) => e.location(),
            PipelineError::Text(e) => e.location(),
        }
    }

    fn describe(&self) -> String {
        match self {
            PipelineError::Convert(e) => e.describe(),
            PipelineError::Text(e) => e.describe(),
        }
    }
}

/// The output of the whole pipeline.
#[derive(Debug)]
pub struct Compiled {
    /// TAC text, one instruction per line.
    pub code: String,
    /// Empty when optimisation was skipped.
    pub log: OptimisationLog,
}

/// Optimises TAC text, returning the optimised text and the log.
pub fn optimise_text(tac: &str) -> Result<Compiled, TextError> {
    let listing = il::parse_tac(tac)?;
    let optimised = il::optimise(listing);

    Ok(Compiled {
        code: il::render(&optimised.listing),
        log: optimised.log,
    })
}

/// Converts tree text to TAC text, then optionally optimises it. The optimiser works on the
/// text form, exactly as if the two stages were run separately.
pub fn compile(tree: &str, optimise: bool) -> Result<Compiled, PipelineError> {
    let code = il::render(&il::convert(tree)?);
    if !optimise {
        return Ok(Compiled {
            code,
            log: OptimisationLog::new(),
        });
    }

    info!("Optimising generated code");
    Ok(optimise_text(&code)?)
}
