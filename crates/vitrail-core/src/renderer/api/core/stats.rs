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

//! Performance statistics for the device.

/// Counters accumulated across every presented frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Total draw calls submitted.
    pub draw_calls: u64,
    /// Total triangles submitted.
    pub triangles: u64,
    /// Number of frames presented.
    pub frames: u64,
}

impl FrameStats {
    /// Folds one frame's queue counters into the totals.
    pub fn accumulate(&mut self, draw_calls: u32, triangles: u32) {
        self.draw_calls += u64::from(draw_calls);
        self.triangles += u64::from(triangles);
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut stats = FrameStats::default();
        stats.accumulate(3, 12);
        stats.accumulate(0, 0);
        stats.accumulate(u32::MAX, u32::MAX);
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.draw_calls, 3 + u64::from(u32::MAX));
        assert_eq!(stats.triangles, 12 + u64::from(u32::MAX));
    }
}
