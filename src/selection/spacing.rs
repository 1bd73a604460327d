//! In-session presentation order.
//!
//! A session queue may present the same word several times. Spacing keeps
//! equal identifiers at least `min_distance` positions apart: positions
//! `i < j` holding the same word satisfy `j - i >= min_distance` whenever
//! the queue admits such an order.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::WordId;

/// Reorder `queue` in place so repeats are spread out.
///
/// Local swaps are tried first, keeping the existing order where possible.
/// If that does not resolve every conflict the queue is rebuilt greedily.
/// Returns whether the final order satisfies the distance.
pub fn space_queue(queue: &mut [WordId], min_distance: usize) -> bool {
    if min_distance <= 1 || queue.len() < 2 {
        return true;
    }

    swap_pass(queue, min_distance);
    if is_spaced(queue, min_distance) {
        return true;
    }

    tracing::debug!(len = queue.len(), min_distance, "local swaps insufficient, rebuilding queue");
    rebuild(queue, min_distance);
    let spaced = is_spaced(queue, min_distance);
    if !spaced {
        tracing::debug!(min_distance, "queue cannot be fully spaced");
    }
    spaced
}

/// Whether every pair of equal identifiers is at least `min_distance` apart.
pub fn is_spaced(queue: &[WordId], min_distance: usize) -> bool {
    let mut last_seen: HashMap<&WordId, usize> = HashMap::new();
    for (position, word) in queue.iter().enumerate() {
        if let Some(previous) = last_seen.insert(word, position) {
            if position - previous < min_distance {
                return false;
            }
        }
    }
    true
}

/// Repeat each word, shuffle, and space the result.
pub fn build_session_queue<R: Rng + ?Sized>(
    words: &[WordId],
    repetitions: usize,
    min_distance: usize,
    rng: &mut R,
) -> Vec<WordId> {
    let mut queue: Vec<WordId> = words
        .iter()
        .flat_map(|w| std::iter::repeat_n(w.clone(), repetitions))
        .collect();
    queue.shuffle(rng);
    space_queue(&mut queue, min_distance);
    queue
}

fn conflicts_at(queue: &[WordId], position: usize, word: &WordId, min_distance: usize) -> bool {
    let start = position.saturating_sub(min_distance - 1);
    queue[start..position].iter().any(|w| w == word)
}

fn swap_pass(queue: &mut [WordId], min_distance: usize) {
    for i in 0..queue.len() {
        if !conflicts_at(queue, i, &queue[i], min_distance) {
            continue;
        }
        let candidate = (i + 1..queue.len())
            .find(|&j| !conflicts_at(queue, i, &queue[j], min_distance));
        if let Some(j) = candidate {
            queue.swap(i, j);
        }
    }
}

/// Greedy rebuild: at each position place the word with the most remaining
/// copies that is outside its cooldown; ties go to the word seen first.
fn rebuild(queue: &mut [WordId], min_distance: usize) {
    let mut order: Vec<WordId> = Vec::new();
    let mut remaining: HashMap<WordId, usize> = HashMap::new();
    for word in queue.iter() {
        let count = remaining.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word.clone());
        }
        *count += 1;
    }

    let mut last_placed: HashMap<usize, usize> = HashMap::new();
    let mut rebuilt: Vec<WordId> = Vec::with_capacity(queue.len());

    for position in 0..queue.len() {
        let available = |index: &usize| {
            last_placed
                .get(index)
                .is_none_or(|&last| position - last >= min_distance)
        };
        let best = |filter_cooldown: bool| {
            (0..order.len())
                .filter(|i| remaining[&order[*i]] > 0)
                .filter(|i| !filter_cooldown || available(i))
                .max_by(|a, b| {
                    remaining[&order[*a]]
                        .cmp(&remaining[&order[*b]])
                        .then(b.cmp(a))
                })
        };

        // fall back to a violating placement only when nothing else fits
        let Some(index) = best(true).or_else(|| best(false)) else {
            break;
        };

        let word = order[index].clone();
        if let Some(count) = remaining.get_mut(&word) {
            *count -= 1;
        }
        last_placed.insert(index, position);
        rebuilt.push(word);
    }

    queue.clone_from_slice(&rebuilt);
}
