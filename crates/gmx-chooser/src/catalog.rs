//! The SIMD variant catalog.
//!
//! GROMACS is built once per SIMD level and each build installs its
//! binaries into `bin.<SUFFIX>` under the common prefix
//! (`CMAKE_INSTALL_BINDIR=bin.$simd$`). The catalog lists those levels from
//! most to least capable; a variant's priority is its position here.

use crate::capabilities::FeatureSet;
use serde::Serialize;

/// One precompiled SIMD build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Human label for the instruction-set level.
    pub simd: &'static str,
    /// CPU flag that must be present (substring match).
    pub tag: &'static str,
    /// Install directory suffix (`bin.<suffix>`).
    pub directory_suffix: &'static str,
    /// Position in the catalog; lower is more capable.
    pub priority: usize,
}

/// Catalog, most capable first. Order is load-bearing.
pub const VARIANTS: [Variant; 4] = [
    Variant {
        simd: "AVX-512",
        tag: "avx512f",
        directory_suffix: "AVX_512",
        priority: 0,
    },
    Variant {
        simd: "AVX2-256",
        tag: "avx2",
        directory_suffix: "AVX2_256",
        priority: 1,
    },
    Variant {
        simd: "AVX-256",
        tag: "avx",
        directory_suffix: "AVX_256",
        priority: 2,
    },
    Variant {
        simd: "SSE2",
        tag: "sse2",
        directory_suffix: "SSE2",
        priority: 3,
    },
];

/// The full catalog in priority order.
pub fn variants() -> &'static [Variant] {
    &VARIANTS
}

impl Variant {
    /// Name of the variant's install directory under the prefix.
    pub fn directory_name(&self) -> String {
        format!("bin.{}", self.directory_suffix)
    }

    /// Whether the host advertises this variant's instruction set.
    pub fn is_supported_by(&self, features: &FeatureSet) -> bool {
        features.contains_tag(self.tag)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (bin.{})", self.simd, self.directory_suffix)
    }
}

/// Most capable variant the host supports, ignoring what is installed.
pub fn best_supported(features: &FeatureSet) -> Option<&'static Variant> {
    variants().iter().find(|v| v.is_supported_by(features))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_matches_position() {
        for (index, variant) in variants().iter().enumerate() {
            assert_eq!(variant.priority, index, "{} out of place", variant.simd);
        }
    }

    #[test]
    fn test_catalog_order() {
        let suffixes: Vec<&str> = variants().iter().map(|v| v.directory_suffix).collect();
        assert_eq!(suffixes, ["AVX_512", "AVX2_256", "AVX_256", "SSE2"]);
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(VARIANTS[1].directory_name(), "bin.AVX2_256");
        assert_eq!(VARIANTS[3].directory_name(), "bin.SSE2");
    }

    #[test]
    fn test_is_supported_by() {
        let features = FeatureSet::from_flags("sse sse2 avx avx2");
        assert!(!VARIANTS[0].is_supported_by(&features));
        assert!(VARIANTS[1].is_supported_by(&features));
        assert!(VARIANTS[2].is_supported_by(&features));
        assert!(VARIANTS[3].is_supported_by(&features));
    }

    #[test]
    fn test_best_supported() {
        let skylake = FeatureSet::from_flags("sse2 avx avx2 avx512f avx512bw");
        assert_eq!(best_supported(&skylake).map(|v| v.priority), Some(0));

        let old = FeatureSet::from_flags("sse sse2");
        assert_eq!(best_supported(&old).map(|v| v.simd), Some("SSE2"));

        assert!(best_supported(&FeatureSet::default()).is_none());
    }
}
