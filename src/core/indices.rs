use hashbrown::HashMap;

use crate::types::BookId;

/// Position of each id within the insertion-order vector.
pub type PosIndex = HashMap<BookId, usize>;

/// Refreshes positions for every id at or after `from`.
pub fn reindex_from(pos: &mut PosIndex, order: &[BookId], from: usize) {
    for (idx, id) in order.iter().enumerate().skip(from) {
        pos.insert(*id, idx);
    }
}
