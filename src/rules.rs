//! Naming rules for model sidecars and platform-specific mesh files
//!
//! These are fixed Source engine conventions, not data read from the archive.
//! A compiled model `foo.mdl` ships with vertex, physics and mesh-index files
//! that share its base name, and some of those mesh-index files are only ever
//! loaded on a single hardware target.

/// Extension of a compiled model entry
pub const MODEL_EXTENSION: &str = ".mdl";

/// Sidecar extensions that travel with a model of the same base name
pub const ASSOCIATED_MODEL_EXTENSIONS: [&str; 6] =
    [".dx80.vtx", ".dx90.vtx", ".phy", ".sw.vtx", ".vtx", ".vvd"];

/// Xbox mesh-index suffix
pub const XBOX_VTX_SUFFIX: &str = ".xbox.vtx";

/// Software-renderer mesh-index suffix
pub const SW_VTX_SUFFIX: &str = ".sw.vtx";

/// Mesh-index suffixes that are dead weight on PC builds
pub const PLATFORM_VARIANT_SUFFIXES: [&str; 2] = [XBOX_VTX_SUFFIX, SW_VTX_SUFFIX];

/// Platform a mesh-index variant was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariantKind {
    /// `*.xbox.vtx`
    Xbox,
    /// `*.sw.vtx`
    Software,
}

impl VariantKind {
    /// Classify an entry name by its platform-variant suffix
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(XBOX_VTX_SUFFIX) {
            Some(VariantKind::Xbox)
        } else if name.ends_with(SW_VTX_SUFFIX) {
            Some(VariantKind::Software)
        } else {
            None
        }
    }

    /// The suffix this variant is recognised by
    pub fn suffix(self) -> &'static str {
        match self {
            VariantKind::Xbox => XBOX_VTX_SUFFIX,
            VariantKind::Software => SW_VTX_SUFFIX,
        }
    }
}

/// Check if an entry name is a compiled model
pub fn is_model(name: &str) -> bool {
    name.ends_with(MODEL_EXTENSION)
}

/// Derive the candidate sidecar names for a model entry
///
/// Returns an empty list when `model` does not end in [`MODEL_EXTENSION`].
/// The model itself is not part of the result.
pub fn associated_names(model: &str) -> Vec<String> {
    match model.strip_suffix(MODEL_EXTENSION) {
        Some(base) => ASSOCIATED_MODEL_EXTENSIONS
            .iter()
            .map(|ext| format!("{}{}", base, ext))
            .collect(),
        None => Vec::new(),
    }
}
