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

//! The fixed capability set a device negotiates at startup.

use std::fmt;
use std::ops::Index;

/// A hardware or driver capability.
///
/// The set is closed: adding a variant forces [`Feature::index`] and
/// [`Feature::ALL`] to be updated, which keeps [`FeatureTable`] total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// 32-bit float color attachments can be rendered to.
    ColorFloat,
    /// 16-bit float color attachments can be rendered to.
    ColorHalfFloat,
    /// 32-bit float textures can be sampled.
    TextureFloat,
    /// 16-bit float textures can be sampled.
    TextureHalfFloat,
    /// 32-bit float textures support linear filtering.
    TextureFloatLinear,
    /// 16-bit float textures support linear filtering.
    TextureHalfFloatLinear,
    /// Packed `R11G11B10` float textures.
    FormatR11G11B10F,
    /// Combined 24-bit depth and 8-bit stencil textures.
    FormatD24S8,
    /// ETC1 compressed textures.
    FormatEtc1,
    /// ETC2 compressed textures.
    FormatEtc2,
    /// PVRTC compressed textures.
    FormatPvrtc,
    /// ASTC compressed textures.
    FormatAstc,
    /// Multisampled render targets.
    Msaa,
}

impl Feature {
    /// The number of features.
    pub const COUNT: usize = 13;

    /// An array containing all `Feature` variants, in index order.
    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::ColorFloat,
        Feature::ColorHalfFloat,
        Feature::TextureFloat,
        Feature::TextureHalfFloat,
        Feature::TextureFloatLinear,
        Feature::TextureHalfFloatLinear,
        Feature::FormatR11G11B10F,
        Feature::FormatD24S8,
        Feature::FormatEtc1,
        Feature::FormatEtc2,
        Feature::FormatPvrtc,
        Feature::FormatAstc,
        Feature::Msaa,
    ];

    /// Returns the slot of this feature in a [`FeatureTable`].
    pub const fn index(self) -> usize {
        match self {
            Feature::ColorFloat => 0,
            Feature::ColorHalfFloat => 1,
            Feature::TextureFloat => 2,
            Feature::TextureHalfFloat => 3,
            Feature::TextureFloatLinear => 4,
            Feature::TextureHalfFloatLinear => 5,
            Feature::FormatR11G11B10F => 6,
            Feature::FormatD24S8 => 7,
            Feature::FormatEtc1 => 8,
            Feature::FormatEtc2 => 9,
            Feature::FormatPvrtc => 10,
            Feature::FormatAstc => 11,
            Feature::Msaa => 12,
        }
    }
}

const _: () = {
    let mut i = 0;
    while i < Feature::COUNT {
        assert!(Feature::ALL[i].index() == i);
        i += 1;
    }
};

/// One boolean per [`Feature`], indexed by the enum.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureTable {
    flags: [bool; Feature::COUNT],
}

impl FeatureTable {
    /// Creates a table with every feature unsupported.
    pub const fn new() -> Self {
        Self {
            flags: [false; Feature::COUNT],
        }
    }

    /// Marks a feature as supported or not.
    pub fn set(&mut self, feature: Feature, supported: bool) {
        self.flags[feature.index()] = supported;
    }

    /// Returns `true` if the feature is supported.
    pub const fn supports(&self, feature: Feature) -> bool {
        self.flags[feature.index()]
    }

    /// Iterates over every feature with its support flag.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.flags[f.index()]))
    }

    /// Returns the number of supported features.
    pub fn supported_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

impl Index<Feature> for FeatureTable {
    type Output = bool;

    fn index(&self, feature: Feature) -> &bool {
        &self.flags[feature.index()]
    }
}

impl fmt::Debug for FeatureTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().filter(|(_, on)| *on).map(|(feature, _)| feature))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_empty() {
        let table = FeatureTable::new();
        assert_eq!(table.supported_count(), 0);
        assert!(Feature::ALL.iter().all(|&f| !table[f]));
    }

    #[test]
    fn test_set_and_index() {
        let mut table = FeatureTable::new();
        table.set(Feature::FormatAstc, true);
        assert!(table[Feature::FormatAstc]);
        assert!(table.supports(Feature::FormatAstc));
        assert!(!table[Feature::FormatPvrtc]);

        table.set(Feature::FormatAstc, false);
        assert!(!table.supports(Feature::FormatAstc));
    }

    #[test]
    fn test_debug_lists_supported_only() {
        let mut table = FeatureTable::new();
        table.set(Feature::Msaa, true);
        assert_eq!(format!("{table:?}"), "{Msaa}");
    }
}
