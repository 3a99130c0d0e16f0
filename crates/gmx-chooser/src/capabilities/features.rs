//! Normalized CPU feature tokens.

use crate::names::RDTSCP_FLAG;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowercase CPU feature tokens captured once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    tokens: BTreeSet<String>,
}

impl FeatureSet {
    /// Build from whitespace-separated flag text (case-folded).
    pub fn from_flags(text: &str) -> Self {
        text.split_whitespace().collect()
    }

    /// Substring match against every token: tag `avx2` matches token `avx2`,
    /// tag `avx` also matches `avx512f`.
    pub fn contains_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tokens.iter().any(|token| token.contains(&tag))
    }

    /// Whether the RDTSCP timing instruction is advertised.
    pub fn has_rdtscp(&self) -> bool {
        self.contains_tag(RDTSCP_FLAG)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FeatureSet {
            tokens: iter
                .into_iter()
                .map(|token| token.as_ref().trim().to_lowercase())
                .filter(|token| !token.is_empty())
                .collect(),
        }
    }
}

impl std::fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(" "))
    }
}

/// Extract the first `flags` line of `/proc/cpuinfo` content.
///
/// Format: "flags\t\t: fpu vme de pse tsc msr ..."
/// Returns an empty set when no flags line is present (e.g. on aarch64,
/// which reports "Features" instead).
pub fn parse_cpuinfo_flags(content: &str) -> FeatureSet {
    content
        .lines()
        .find(|line| line.starts_with("flags"))
        .map(|line| {
            let value = line.split_once(':').map_or(line, |(_, value)| value);
            FeatureSet::from_flags(value)
        })
        .unwrap_or_default()
}

/// Normalize `sysctl -n machdep.cpu.features machdep.cpu.leaf7_features`
/// output: one line per key, uppercase tokens.
pub fn parse_sysctl_features(output: &str) -> FeatureSet {
    output.lines().flat_map(str::split_whitespace).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz
flags\t\t: fpu vme de pse tsc msr sse sse2 ht syscall nx rdtscp lm avx avx2 avx512f
bugs\t\t: spectre_v1

processor\t: 1
flags\t\t: fpu sse sse2
";

    #[test]
    fn test_from_flags_lowercases() {
        let features = FeatureSet::from_flags("FPU VME SSE2 AVX1.0");
        assert!(features.contains_tag("sse2"));
        assert!(features.contains_tag("avx"));
        assert_eq!(features.len(), 4);
    }

    #[test]
    fn test_contains_tag_is_substring() {
        let features = FeatureSet::from_flags("avx512f sse2");
        assert!(features.contains_tag("avx"));
        assert!(features.contains_tag("avx512f"));
        assert!(!features.contains_tag("avx2"));
        assert!(features.contains_tag("AVX512F"));
    }

    #[test]
    fn test_has_rdtscp() {
        assert!(FeatureSet::from_flags("sse2 rdtscp").has_rdtscp());
        assert!(FeatureSet::from_flags("RDTSCP").has_rdtscp());
        assert!(!FeatureSet::from_flags("sse2 rdtsc").has_rdtscp());
    }

    #[test]
    fn test_parse_cpuinfo_uses_first_flags_line() {
        let features = parse_cpuinfo_flags(CPUINFO);
        assert!(features.contains_tag("avx512f"));
        assert!(features.has_rdtscp());
        assert!(!features.iter().any(|t| t == "gold"));
    }

    #[test]
    fn test_parse_cpuinfo_without_flags() {
        let content = "processor\t: 0\nFeatures\t: fp asimd evtstrm aes\n";
        assert!(parse_cpuinfo_flags(content).is_empty());
    }

    #[test]
    fn test_parse_sysctl_joins_both_keys() {
        let features = parse_sysctl_features("FPU SSE2 AVX1.0\nAVX2 AVX512F RDTSCP\n");
        assert_eq!(features.len(), 6);
        assert!(features.contains_tag("avx512f"));
        assert!(features.has_rdtscp());
        assert!(features.iter().any(|t| t == "avx1.0"));
        assert!(features.contains_tag("avx"));
        assert!(!FeatureSet::from_flags("fpu sse2").contains_tag("avx"));
    }

    #[test]
    fn test_parse_sysctl_empty_leaf7_line() {
        let features = parse_sysctl_features("FPU SSE2\n\n");
        assert_eq!(features.iter().collect::<Vec<_>>(), ["fpu", "sse2"]);
    }

    #[test]
    fn test_empty_tokens_dropped() {
        let features: FeatureSet = ["sse2", "  ", ""].into_iter().collect();
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn test_display_is_sorted() {
        let features = FeatureSet::from_flags("sse2 avx fpu");
        assert_eq!(features.to_string(), "avx fpu sse2");
    }
}
