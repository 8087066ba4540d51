pub mod cognates;
pub mod concepts;
pub mod diagnostics;
pub mod forms;
pub mod languages;
pub mod lexemes;
pub mod segments;

pub use cognates::*;
pub use concepts::*;
pub use diagnostics::*;
pub use forms::*;
pub use languages::*;
pub use lexemes::*;
pub use segments::*;

use thiserror::Error;

use crate::store::StoreError;
use crate::writer::WriteError;

/// Errors that abort assembly and leave no output behind.
///
/// Recoverable conditions never surface here: forms with unknown sounds go
/// to the flagged bucket, forms whose segments cannot be analyzed go to the
/// invalid bucket, and both stay in the store.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] segments::AnalysisError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}
