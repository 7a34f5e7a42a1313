//! Best-fit asset selection and the non-repeating draw order.
//!
//! Targeted effects are stretched to span the source-target distance, so the
//! selector prefers the width class that covers the most of the distance
//! without being stretched past its native size. Centered effects skip fitting
//! and use every candidate.
use rand::Rng;

use crate::catalog::AssetEntry;

/// Outcome of best-fit selection.
#[derive(Clone, Debug, PartialEq)]
pub struct BestFit {
    /// Chosen native width class; `None` for centered selections.
    pub width: Option<u32>,
    /// Candidates sharing the chosen width, in catalog order.
    pub pool: Vec<AssetEntry>,
}

/// Picks the width class for `distance` and returns every candidate in it.
///
/// With `fit = distance / width`, the class with the largest fit strictly
/// below `1.0` wins. If no fit is in `(0, 1)`, the class with the smallest fit
/// wins, first candidate on ties.
pub fn select_best_fit(candidates: &[AssetEntry], distance: f64, centered: bool) -> BestFit {
    if centered {
        return BestFit {
            width: None,
            pool: candidates.to_vec(),
        };
    }

    let fit = |entry: &AssetEntry| distance / f64::from(entry.native_width);

    let mut best = 0.0;
    let mut best_width = None;
    for entry in candidates {
        let scale = fit(entry);
        if scale >= best && scale < 1.0 {
            best = scale;
            best_width = Some(entry.native_width);
        }
    }

    // A zero best means nothing fit below native size (or the distance is zero).
    if best == 0.0 {
        let mut smallest = f64::INFINITY;
        best_width = None;
        for entry in candidates {
            let scale = fit(entry);
            if scale < smallest {
                smallest = scale;
                best_width = Some(entry.native_width);
            }
        }
    }

    let pool = match best_width {
        Some(width) => candidates
            .iter()
            .filter(|entry| entry.native_width == width)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    BestFit {
        width: best_width,
        pool,
    }
}

/// Working pool that hands out every member once per round.
///
/// Draws remove a uniformly random index; an empty pool is refilled from the
/// selection before the next draw. The first draw of a new round never repeats
/// the last draw of the previous one unless the selection has a single member.
#[derive(Clone, Debug)]
pub struct DrawPool<'a> {
    selection: &'a [AssetEntry],
    remaining: Vec<usize>,
    last: Option<usize>,
}

impl<'a> DrawPool<'a> {
    pub fn new(selection: &'a [AssetEntry]) -> Self {
        Self {
            selection,
            remaining: (0..selection.len()).collect(),
            last: None,
        }
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'a AssetEntry> {
        if self.selection.is_empty() {
            return None;
        }

        let mut held_back = None;
        if self.remaining.is_empty() {
            self.remaining.extend(0..self.selection.len());
            if let Some(last) = self.last
                && self.remaining.len() > 1
            {
                self.remaining.swap_remove(last);
                held_back = Some(last);
            }
        }

        let picked = self.remaining.swap_remove(rng.gen_range(0..self.remaining.len()));
        if let Some(last) = held_back {
            self.remaining.push(last);
        }
        self.last = Some(picked);
        Some(&self.selection[picked])
    }
}

/// Draws `count` assets from `pool`, non-repeating until the pool is exhausted.
pub fn draw_sequence<R: Rng + ?Sized>(
    pool: &[AssetEntry],
    count: usize,
    rng: &mut R,
) -> Vec<AssetEntry> {
    let mut draws = DrawPool::new(pool);
    (0..count)
        .map_while(|_| draws.draw(rng).cloned())
        .collect()
}
