// In: src/chunk_pipeline/planner.rs

//! The chunk planner: splits the identifier list into bounded batches.
//!
//! Identifiers are grouped by their compound-key left segment (the text before
//! the first `-`). A group is never split across chunks, so every row for a
//! given key lands in a single selector query. The post-processor depends on
//! this to aggregate a key completely within one chunk.

use hashbrown::HashMap;

/// An ordered, non-empty batch of primary-key values.
pub type Chunk = Vec<String>;

/// The text that decides group membership. Identifiers without a `-` are their
/// own group key.
pub fn group_key(id: &str) -> &str {
    id.split_once('-').map_or(id, |(left, _)| left)
}

/// Groups identifiers by `group_key`, preserving first-seen group order and
/// within-group order.
fn group_in_order(ids: &[String]) -> Vec<Vec<String>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<String>> = Vec::new();
    for id in ids {
        let key = group_key(id);
        match index.get(key) {
            Some(&slot) => groups[slot].push(id.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![id.clone()]);
            }
        }
    }
    groups
}

/// Plans the chunks for `ids`.
///
/// The current chunk is closed before a group that would fill it up to
/// `chunk_size` or beyond. A single group larger than `chunk_size` stays whole
/// in its own oversized chunk. Empty input yields no chunks.
///
/// A chunk assembled from several groups therefore holds at most
/// `chunk_size - 1` identifiers; only a lone group can reach or pass `chunk_size`.
pub fn plan_chunks(ids: &[String], chunk_size: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Chunk = Vec::new();

    for group in group_in_order(ids) {
        if !current.is_empty() && current.len() + group.len() >= chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
        current.extend(group);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    log::debug!(
        "Planned {} chunk(s) for {} identifier(s) at chunk size {}",
        chunks.len(),
        ids.len(),
        chunk_size
    );
    chunks
}
