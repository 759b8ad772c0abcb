//! Target language support for the JibJab workbench.
//!
//! Each target is described by one immutable [`LanguageProfile`]: how it
//! spells literals and operators, how its lines are recognized when reading
//! source back into JibJab, and how it is compiled and run. Profiles are
//! built once and looked up by [`TargetId`].
//!
//! # Example
//!
//! ```
//! use jibjab_languages::{profile, BlockStyle, TargetId};
//!
//! let py = profile(TargetId::Py);
//! assert_eq!(py.extension, "py");
//! assert_eq!(py.block_style, BlockStyle::Indentation);
//! ```

mod applescript;
mod asm;
mod c;
mod c_family;
mod cpp;
mod go;
mod javascript;
mod objc;
mod profile;
mod python;
mod registry;
mod swift;
mod target;

pub use profile::{
    BlockStyle, LanguageProfile, Literals, MainWrapper, Operator, ParamStyle, Quirks,
    Recognizers, ToolchainDefaults,
};
pub use registry::{profile, profile_for_extension, profiles};
pub use target::{TargetId, UnknownTarget};
