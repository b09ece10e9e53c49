// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns a driver's extension string into the device's capability set.
//!
//! Every decision here is a case-sensitive substring test against the
//! whitespace-separated extension names. A marker such as `compressed_ETC1`
//! matches `GL_OES_compressed_ETC1_RGB8_texture`; there is no exact-name
//! matching.

use super::features::{Feature, FeatureTable};

/// Features reported regardless of the extension string.
const UNCONDITIONAL: [Feature; 6] = [
    Feature::TextureFloat,
    Feature::TextureHalfFloat,
    Feature::FormatR11G11B10F,
    Feature::FormatD24S8,
    Feature::Msaa,
    Feature::FormatEtc2,
];

/// Features gated on an extension marker.
const GATED: [(Feature, &str); 7] = [
    (Feature::ColorFloat, "color_buffer_float"),
    (Feature::ColorHalfFloat, "color_buffer_half_float"),
    (Feature::TextureFloatLinear, "texture_float_linear"),
    (Feature::TextureHalfFloatLinear, "texture_half_float_linear"),
    (Feature::FormatEtc1, "compressed_ETC1"),
    (Feature::FormatPvrtc, "texture_compression_pvrtc"),
    (Feature::FormatAstc, "texture_compression_astc"),
];

/// Label fragments for the compressed formats, in reporting order.
const COMPRESSED_LABELS: [(Feature, &str); 4] = [
    (Feature::FormatEtc1, "etc1"),
    (Feature::FormatEtc2, "etc2"),
    (Feature::FormatPvrtc, "pvrtc"),
    (Feature::FormatAstc, "astc"),
];

/// The set of extension names reported by a driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    names: Vec<String>,
}

impl ExtensionSet {
    /// Splits a raw, whitespace-separated extension blob.
    pub fn parse(blob: &str) -> Self {
        Self {
            names: blob.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Returns `true` if any extension name contains `marker`.
    pub fn contains(&self, marker: &str) -> bool {
        self.names.iter().any(|name| name.contains(marker))
    }

    /// Iterates over the extension names in driver order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The number of extensions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the driver reported no extensions.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Backend code paths switched on by optional extensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorToggles {
    /// Record vertex layouts into vertex array objects.
    pub use_vao: bool,
    /// Instanced draws are available.
    pub use_draw_instanced: bool,
    /// Per-instance vertex attributes are available.
    pub use_instanced_arrays: bool,
    /// Framebuffer contents may be discarded at the end of a pass.
    pub use_discard_framebuffer: bool,
}

/// The outcome of probing an extension blob.
#[derive(Debug, Clone, Default)]
pub struct CapabilityReport {
    /// The capability table.
    pub features: FeatureTable,
    /// Backend behavior switches.
    pub toggles: BehaviorToggles,
    /// Space-separated names of the supported compressed formats.
    pub compressed_formats: String,
    /// The parsed extension names.
    pub extensions: ExtensionSet,
}

/// Derives the feature table, toggles and compressed-format label from a
/// driver extension blob.
pub fn probe_capabilities(blob: &str) -> CapabilityReport {
    let extensions = ExtensionSet::parse(blob);
    let mut features = FeatureTable::new();

    for feature in UNCONDITIONAL {
        features.set(feature, true);
    }
    for (feature, marker) in GATED {
        features.set(feature, extensions.contains(marker));
    }

    let toggles = BehaviorToggles {
        use_vao: extensions.contains("GL_OES_depth_texture"),
        use_draw_instanced: extensions.contains("draw_instanced_"),
        use_instanced_arrays: extensions.contains("instanced_arrays"),
        use_discard_framebuffer: extensions.contains("discard_framebuffer"),
    };

    let compressed_formats = COMPRESSED_LABELS
        .iter()
        .filter(|(feature, _)| features[*feature])
        .map(|(_, label)| *label)
        .collect::<Vec<_>>()
        .join(" ");

    CapabilityReport {
        features,
        toggles,
        compressed_formats,
        extensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOBILE_BLOB: &str = "GL_OES_compressed_ETC1_RGB8_texture GL_OES_depth_texture \
        GL_EXT_color_buffer_half_float GL_IMG_texture_compression_pvrtc \
        GL_EXT_discard_framebuffer GL_EXT_instanced_arrays";

    #[test]
    fn test_etc1_follows_marker() {
        assert!(probe_capabilities(MOBILE_BLOB).features[Feature::FormatEtc1]);
        assert!(!probe_capabilities("GL_OES_depth_texture").features[Feature::FormatEtc1]);
    }

    #[test]
    fn test_etc2_is_always_reported() {
        let report = probe_capabilities("");
        assert!(report.features[Feature::FormatEtc2]);
        assert_eq!(report.compressed_formats, "etc2");
        assert!(report.extensions.is_empty());
    }

    #[test]
    fn test_unconditional_features() {
        for blob in ["", MOBILE_BLOB, "GL_garbage"] {
            let features = probe_capabilities(blob).features;
            for feature in [
                Feature::TextureFloat,
                Feature::TextureHalfFloat,
                Feature::FormatR11G11B10F,
                Feature::FormatD24S8,
                Feature::Msaa,
            ] {
                assert!(features[feature], "{feature:?} missing for {blob:?}");
            }
        }
    }

    #[test]
    fn test_gated_features_and_label() {
        let report = probe_capabilities(MOBILE_BLOB);
        assert!(report.features[Feature::ColorHalfFloat]);
        assert!(!report.features[Feature::ColorFloat]);
        assert!(report.features[Feature::FormatPvrtc]);
        assert!(!report.features[Feature::FormatAstc]);
        assert_eq!(report.compressed_formats, "etc1 etc2 pvrtc");
    }

    #[test]
    fn test_toggles() {
        let toggles = probe_capabilities(MOBILE_BLOB).toggles;
        assert!(toggles.use_vao);
        assert!(toggles.use_instanced_arrays);
        assert!(toggles.use_discard_framebuffer);
        assert!(!toggles.use_draw_instanced);
    }

    #[test]
    fn test_matching_is_case_sensitive_substring() {
        let set = ExtensionSet::parse("  GL_KHR_texture_compression_astc_ldr\tGL_foo ");
        assert_eq!(set.len(), 2);
        assert!(set.contains("texture_compression_astc"));
        assert!(!set.contains("TEXTURE_COMPRESSION_ASTC"));
        assert!(probe_capabilities("GL_KHR_texture_compression_astc_ldr").features[Feature::FormatAstc]);
    }
}
