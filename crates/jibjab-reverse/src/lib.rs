//! Reading target-language source back into canonical JibJab.
//!
//! Decompilation is heuristic and line-oriented: it understands the shapes
//! the forward transpilers emit (and hand edits close to them), and passes
//! anything else through the expression rewriter unchanged in structure.
//!
//! # Example
//!
//! ```
//! use jibjab_languages::TargetId;
//! use jibjab_reverse::{Decompiled, decompile};
//!
//! let out = decompile(TargetId::Py, "x = 1 + 2\nprint(x)\n");
//! assert_eq!(
//!     out,
//!     Decompiled::Canonical("~>snag{x}::val(#1 <+> #2)\n~>frob{7a3}::emit(x)\n".into())
//! );
//! ```

pub mod canonical;
mod decompiler;
mod formats;
mod prepare;
mod rewriter;
mod text;

pub use decompiler::{Decompiled, Decompiler, decompile};
pub use rewriter::Rewriter;
