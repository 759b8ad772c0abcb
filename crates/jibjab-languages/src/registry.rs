//! Lookup from target identifiers and file extensions to profiles.

use crate::profile::LanguageProfile;
use crate::{TargetId, applescript, asm, c, cpp, go, javascript, objc, python, swift};
use std::sync::LazyLock;

/// Profiles indexed by `TargetId` declaration order.
static PROFILES: LazyLock<[LanguageProfile; 10]> = LazyLock::new(|| {
    [
        python::profile(),
        javascript::profile(),
        c::profile(),
        cpp::profile(),
        swift::profile(),
        objc::objc_profile(),
        objc::objcpp_profile(),
        go::profile(),
        applescript::profile(),
        asm::profile(),
    ]
});

/// The profile for `target`. Every target has one.
pub fn profile(target: TargetId) -> &'static LanguageProfile {
    &PROFILES[target.index()]
}

/// All profiles, in `TargetId::ALL` order.
pub fn profiles() -> impl Iterator<Item = &'static LanguageProfile> {
    PROFILES.iter()
}

/// Find the profile whose source extension is `ext` (without the dot).
pub fn profile_for_extension(ext: &str) -> Option<&'static LanguageProfile> {
    profiles().find(|p| p.extension.eq_ignore_ascii_case(ext))
}
