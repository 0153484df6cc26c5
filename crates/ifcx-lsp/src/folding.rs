// Dweve IFCX - Editor tooling for IFCX documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Folding ranges for the `schemas` block and large attribute arrays.
//!
//! Regions are computed from the current text rather than the last
//! analysis, so folding keeps working while the document does not parse.

use crate::utils::offset_to_position;
use ifcx_core::folding::{large_array_regions, schemas_region, FoldingRegion};
use ropey::Rope;
use tower_lsp::lsp_types::{FoldingRange, FoldingRangeKind};

/// Folding ranges of `text`, in document order.
///
/// Arrays fold when they hold at least `min_array_elements` top-level
/// elements. Regions on a single line are skipped.
pub fn get_folding_ranges(text: &str, min_array_elements: usize) -> Vec<FoldingRange> {
    let rope = Rope::from_str(text);
    let mut regions: Vec<FoldingRegion> = schemas_region(text).into_iter().collect();
    regions.extend(large_array_regions(text, min_array_elements));
    regions.sort_by_key(|region| region.span.start);

    regions
        .into_iter()
        .filter_map(|region| to_folding_range(&rope, &region))
        .collect()
}

fn to_folding_range(rope: &Rope, region: &FoldingRegion) -> Option<FoldingRange> {
    let start = offset_to_position(rope, region.span.start);
    // The span end is one past the closer; fold up to the closer's line.
    let end = offset_to_position(rope, region.span.end.saturating_sub(1));
    if end.line <= start.line {
        return None;
    }
    Some(FoldingRange {
        start_line: start.line,
        end_line: end.line,
        kind: Some(FoldingRangeKind::Region),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_and_arrays() {
        let text = "{\n  \"schemas\": {\n    \"a\": {}\n  },\n  \"points\": [\n    1,\n    2,\n    3\n  ]\n}";
        let ranges = get_folding_ranges(text, 3);
        let lines: Vec<(u32, u32)> = ranges.iter().map(|r| (r.start_line, r.end_line)).collect();
        assert_eq!(lines, vec![(1, 3), (4, 8)]);
    }

    #[test]
    fn test_small_and_single_line_arrays_skipped() {
        let text = "{\n  \"points\": [1, 2, 3, 4],\n  \"few\": [\n    1\n  ]\n}";
        assert!(get_folding_ranges(text, 3).is_empty());
    }

    #[test]
    fn test_invalid_text_still_folds() {
        let text = "{\n  \"schemas\": {\n    \"a\": {}\n  },\n  \"data\": [ oops";
        let ranges = get_folding_ranges(text, 10);
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].start_line, ranges[0].end_line), (1, 3));
    }
}
