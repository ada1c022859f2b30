//! The external device seam.
//!
//! Shader objects are bound to a live device and are never cached; only the
//! bytecode they are created from is.

/// Creates bound shader objects from bytecode.
pub trait ShaderDevice {
    /// Device vertex shader object.
    type VertexShader;
    /// Device geometry shader object.
    type GeometryShader;
    /// Device pixel shader object.
    type PixelShader;
    /// Device compute shader object.
    type ComputeShader;
    /// The device's failure type.
    type Error;

    /// Creates a vertex shader.
    fn create_vertex_shader(&self, bytecode: &[u8]) -> Result<Self::VertexShader, Self::Error>;

    /// Creates a geometry shader.
    fn create_geometry_shader(&self, bytecode: &[u8])
        -> Result<Self::GeometryShader, Self::Error>;

    /// Creates a pixel shader.
    fn create_pixel_shader(&self, bytecode: &[u8]) -> Result<Self::PixelShader, Self::Error>;

    /// Creates a compute shader.
    fn create_compute_shader(&self, bytecode: &[u8]) -> Result<Self::ComputeShader, Self::Error>;
}
