//! Incremental assembly of lexical wordlist datasets: typed records go in
//! through an [`AssemblySession`], a validated CSV dataset directory with
//! JSON metadata and a BibTeX bibliography comes out.

pub mod catalogs;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod sources;
pub mod store;
pub mod writer;

pub use config::DatasetInfo;
pub use pipeline::AssemblyError;
pub use session::{AssemblyOutcome, AssemblySession};
