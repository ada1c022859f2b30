//! Lookup-or-compile orchestration.
//!
//! [`ShaderCache`] is the type a renderer backend owns: one per target
//! profile, opened at startup against a cache directory. It keys every
//! request, serves hits from the blob file, and on a miss runs the compiler
//! and appends the result before handing it back.

use std::path::Path;

use prism_common::{ShaderKind, TargetProfile};
use prism_config::CacheConfig;
use tracing::{debug, warn};

use crate::compiler::ShaderCompiler;
use crate::device::ShaderDevice;
use crate::error::ShaderError;
use crate::index::CacheIndex;
use crate::key::{CacheKey, CacheLocation};
use crate::paths::CachePaths;
use crate::store::{self, CacheFiles, CacheState, OpenedStore};

/// Persistent shader bytecode cache for one target profile.
///
/// Not synchronized: one caller drives it, and no two instances may point at
/// the same file pair. The files are released when the cache is dropped.
pub struct ShaderCache<C> {
    compiler: C,
    profile: TargetProfile,
    paths: CachePaths,
    index: CacheIndex,
    files: Option<CacheFiles>,
    state: CacheState,
}

impl<C: ShaderCompiler> ShaderCache<C> {
    /// Opens the cache for `profile` under `base_path`.
    ///
    /// Missing, stale or corrupt files are replaced with an empty pair. If
    /// that fails too the cache runs [`CacheState::Degraded`]; opening
    /// itself never fails.
    pub fn open(base_path: &Path, profile: TargetProfile, compiler: C) -> Self {
        let paths = CachePaths::new(base_path, &profile);
        let OpenedStore {
            files,
            index,
            state,
        } = store::open(&paths);

        Self {
            compiler,
            profile,
            paths,
            index,
            files,
            state,
        }
    }

    /// Opens the cache described by a `[shader_cache]` configuration section.
    pub fn from_config(config: &CacheConfig, compiler: C) -> Self {
        Self::open(&config.directory, config.target_profile(), compiler)
    }

    /// Returns bytecode for `source`, compiling it only if it is not cached.
    ///
    /// Compiler errors are returned as-is and nothing is persisted for them.
    /// Cache read and write failures are logged and never reported.
    pub fn get_compiled_bytecode(
        &mut self,
        kind: ShaderKind,
        source: &str,
    ) -> Result<Vec<u8>, C::Error> {
        let Some(key) = CacheKey::new(kind, source) else {
            debug!(%kind, len = source.len(), "source too large to key, compiling uncached");
            return self.compiler.compile(kind, &self.profile, source);
        };

        if let Some(location) = self.index.lookup(&key) {
            if let Some(bytecode) = self.read_cached(location) {
                debug!(%kind, hash = %key.content_hash(), "shader cache hit");
                return Ok(bytecode);
            }
            // The entry stays indexed, so this result is not appended again.
            return self.compiler.compile(kind, &self.profile, source);
        }

        debug!(%kind, hash = %key.content_hash(), "shader cache miss");
        let bytecode = self.compiler.compile(kind, &self.profile, source)?;
        self.persist(key, &bytecode);
        Ok(bytecode)
    }

    /// Compiles (or fetches) a vertex shader and creates it on `device`.
    pub fn get_vertex_shader<D: ShaderDevice>(
        &mut self,
        device: &D,
        source: &str,
    ) -> Result<D::VertexShader, ShaderError<C::Error, D::Error>> {
        let bytecode = self
            .get_compiled_bytecode(ShaderKind::Vertex, source)
            .map_err(ShaderError::Compile)?;
        device
            .create_vertex_shader(&bytecode)
            .map_err(|e| self.device_failure(ShaderKind::Vertex, e))
    }

    /// Compiles (or fetches) a geometry shader and creates it on `device`.
    pub fn get_geometry_shader<D: ShaderDevice>(
        &mut self,
        device: &D,
        source: &str,
    ) -> Result<D::GeometryShader, ShaderError<C::Error, D::Error>> {
        let bytecode = self
            .get_compiled_bytecode(ShaderKind::Geometry, source)
            .map_err(ShaderError::Compile)?;
        device
            .create_geometry_shader(&bytecode)
            .map_err(|e| self.device_failure(ShaderKind::Geometry, e))
    }

    /// Compiles (or fetches) a pixel shader and creates it on `device`.
    pub fn get_pixel_shader<D: ShaderDevice>(
        &mut self,
        device: &D,
        source: &str,
    ) -> Result<D::PixelShader, ShaderError<C::Error, D::Error>> {
        let bytecode = self
            .get_compiled_bytecode(ShaderKind::Pixel, source)
            .map_err(ShaderError::Compile)?;
        device
            .create_pixel_shader(&bytecode)
            .map_err(|e| self.device_failure(ShaderKind::Pixel, e))
    }

    /// Compiles (or fetches) a compute shader and creates it on `device`.
    pub fn get_compute_shader<D: ShaderDevice>(
        &mut self,
        device: &D,
        source: &str,
    ) -> Result<D::ComputeShader, ShaderError<C::Error, D::Error>> {
        let bytecode = self
            .get_compiled_bytecode(ShaderKind::Compute, source)
            .map_err(ShaderError::Compile)?;
        device
            .create_compute_shader(&bytecode)
            .map_err(|e| self.device_failure(ShaderKind::Compute, e))
    }

    fn device_failure<E>(&self, kind: ShaderKind, error: E) -> ShaderError<C::Error, E> {
        warn!(%kind, profile = %self.profile, "device rejected shader bytecode");
        ShaderError::Device(error)
    }

    fn read_cached(&mut self, location: CacheLocation) -> Option<Vec<u8>> {
        let files = self.files.as_mut()?;
        match files.read_blob(location) {
            Ok(bytecode) => Some(bytecode),
            Err(e) => {
                warn!(error = %e, "failed to read cached shader, recompiling");
                None
            }
        }
    }

    fn persist(&mut self, key: CacheKey, bytecode: &[u8]) {
        let Some(files) = self.files.as_mut() else {
            return;
        };
        match files.append(&key, bytecode) {
            Ok(location) => {
                self.index.insert(key, location);
            }
            Err(e) => {
                warn!(error = %e, "failed to write shader to cache");
            }
        }
    }

    /// How the cache came up.
    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Number of cached shaders.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `source` is cached for `kind`.
    pub fn contains(&self, kind: ShaderKind, source: &str) -> bool {
        CacheKey::new(kind, source).is_some_and(|key| self.index.contains(&key))
    }

    /// The file pair backing this cache.
    pub fn paths(&self) -> &CachePaths {
        &self.paths
    }

    /// The compilation target this cache serves.
    pub fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    /// The wrapped compiler.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }
}
