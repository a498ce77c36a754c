/// Prefix of framework classes that never need a cross-file `%Include`.
pub const FRAMEWORK_PREFIX: char = 'Q';

/// Whether a base class lives in another artifact of this module.
pub fn needs_include(base: &str) -> bool {
    !base.starts_with(FRAMEWORK_PREFIX)
}

/// Bases that need a `%Include`, in first-seen order, once each, leaving out
/// classes exported by the same header.
pub fn include_targets<'a>(
    bases: impl IntoIterator<Item = &'a str>,
    exported_here: &[String],
) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for base in bases {
        if !needs_include(base) || exported_here.iter().any(|class| class == base) {
            continue;
        }
        if !targets.iter().any(|target| target == base) {
            targets.push(base.to_string());
        }
    }
    targets
}

/// `%Include <target>.<extension>` lines, each newline-terminated.
pub fn include_block(
    targets: &[String],
    extension: &str,
) -> String {
    targets
        .iter()
        .map(|target| format!("%Include {target}.{extension}\n"))
        .collect()
}
