//! Conversion of analysis results into `lsp-types` values
//!
//! Analysis speaks byte offsets in the host document; everything here maps
//! them through [`HostDocument`](crate::document::HostDocument) into
//! protocol positions.

pub mod code_lens;
pub mod diagnostics;
pub mod navigation;
pub mod semantic_tokens;

pub use code_lens::{explain_lens, explain_lenses, explain_prompt};
pub use diagnostics::{to_lsp_diagnostic, to_lsp_diagnostics};
pub use navigation::ParameterNavigator;
pub use semantic_tokens::{encode, legend};
