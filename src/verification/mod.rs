use std::path::Path;

/// Post-wipe verification.
///
/// This is an existence check only: it confirms the target paths are gone,
/// it does not read back on-disk bytes or prove that the physical cells
/// holding earlier contents were overwritten. On wear-leveled or
/// copy-on-write media no file-level overwrite can prove that. Callers
/// that need a stronger guarantee need device-level sanitization, which is
/// outside this crate's contract.
pub struct Verifier;

impl Verifier {
    /// True iff none of the given paths still exist.
    pub fn verify_removed<'a, I>(paths: I) -> bool
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut all_removed = true;

        for path in paths {
            if path.exists() {
                tracing::warn!(path = %path.display(), "target still exists after wipe");
                all_removed = false;
            }
        }

        all_removed
    }
}
