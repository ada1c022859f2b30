//! The external shader compiler seam.

use prism_common::{ShaderKind, TargetProfile};

/// Turns shader source text into backend bytecode.
///
/// The cache calls this only on a miss. Its error type is handed back to the
/// caller untouched.
pub trait ShaderCompiler {
    /// The compiler's failure type.
    type Error;

    /// Compiles `source` for `kind` against `profile`.
    fn compile(
        &mut self,
        kind: ShaderKind,
        profile: &TargetProfile,
        source: &str,
    ) -> Result<Vec<u8>, Self::Error>;
}

impl<F, E> ShaderCompiler for F
where
    F: FnMut(ShaderKind, &TargetProfile, &str) -> Result<Vec<u8>, E>,
{
    type Error = E;

    fn compile(
        &mut self,
        kind: ShaderKind,
        profile: &TargetProfile,
        source: &str,
    ) -> Result<Vec<u8>, E> {
        self(kind, profile, source)
    }
}
