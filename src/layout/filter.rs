//! Zone membership and right-to-left ordering.

use crate::model::{TextBlock, Zone};

/// Select the blocks fully contained in `zone` and order them for reading.
///
/// Vertical Japanese is read column by column from the right edge of the page,
/// so blocks are sorted by descending left edge. The sort is stable: blocks
/// that share a left edge keep the order the extractor supplied, which is
/// their top-to-bottom order within a column.
///
/// Blocks that only partially overlap the zone are dropped. The result is
/// empty when nothing qualifies.
pub fn select_and_order<'a>(blocks: &'a [TextBlock], zone: &Zone) -> Vec<&'a TextBlock> {
    let mut selected: Vec<&TextBlock> = blocks
        .iter()
        .filter(|block| zone.bbox.contains(&block.bbox))
        .collect();

    selected.sort_by(|a, b| b.x().total_cmp(&a.x()));
    selected
}
