//! Pipeline stage tags.

use std::fmt;

/// The pipeline stage a shader is compiled for.
///
/// Part of every cache key: identical source text compiles to different
/// bytecode per stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    /// Vertex shader.
    Vertex,
    /// Geometry shader.
    Geometry,
    /// Pixel (fragment) shader.
    Pixel,
    /// Compute shader.
    Compute,
}

/// A stored stage code that does not name any [`ShaderKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader kind code {0}")]
pub struct UnknownShaderKind(pub u32);

impl ShaderKind {
    /// Every stage, in code order.
    pub const ALL: [ShaderKind; 4] = [
        ShaderKind::Vertex,
        ShaderKind::Geometry,
        ShaderKind::Pixel,
        ShaderKind::Compute,
    ];

    /// The stable numeric code persisted in index records.
    pub fn code(self) -> u32 {
        match self {
            ShaderKind::Vertex => 0,
            ShaderKind::Geometry => 1,
            ShaderKind::Pixel => 2,
            ShaderKind::Compute => 3,
        }
    }

    /// Lowercase stage name.
    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Geometry => "geometry",
            ShaderKind::Pixel => "pixel",
            ShaderKind::Compute => "compute",
        }
    }
}

impl TryFrom<u32> for ShaderKind {
    type Error = UnknownShaderKind;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ShaderKind::Vertex),
            1 => Ok(ShaderKind::Geometry),
            2 => Ok(ShaderKind::Pixel),
            3 => Ok(ShaderKind::Compute),
            other => Err(UnknownShaderKind(other)),
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for kind in ShaderKind::ALL {
            assert_eq!(ShaderKind::try_from(kind.code()), Ok(kind));
        }
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ShaderKind::Vertex.code(), 0);
        assert_eq!(ShaderKind::Geometry.code(), 1);
        assert_eq!(ShaderKind::Pixel.code(), 2);
        assert_eq!(ShaderKind::Compute.code(), 3);
    }

    #[test]
    fn unknown_code_rejected() {
        let err = ShaderKind::try_from(7).unwrap_err();
        assert_eq!(err, UnknownShaderKind(7));
        assert_eq!(err.to_string(), "unknown shader kind code 7");
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(ShaderKind::Pixel.to_string(), "pixel");
        assert_eq!(ShaderKind::Compute.to_string(), "compute");
    }
}
