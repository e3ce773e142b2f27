use metrics::counter;
use rand::Rng;
use tracing::warn;

use crate::article::Article;

/// Redraws allowed after the first attempt before the pick gives up.
const MAX_RETRIES: usize = 50;

/// Pick the index of the next article to publish from a non-empty list.
///
/// Draws uniformly at random and accepts the first unposted entry. After
/// [`MAX_RETRIES`] rejected draws the pick falls back to index 0 even when
/// entry 0 is already posted, so a nearly saturated list can repost. The
/// fallback is counted as `select_fallback_total`.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, active: &[Article]) -> usize {
    debug_assert!(!active.is_empty(), "pick_index on an empty list");
    for _ in 0..=MAX_RETRIES {
        let idx = rng.random_range(0..active.len());
        if !active[idx].posted {
            return idx;
        }
    }
    counter!("select_fallback_total").increment(1);
    warn!(len = active.len(), "selection retries exhausted, falling back to index 0");
    0
}

/// Production entry point drawing from the thread RNG.
pub fn pick(active: &[Article]) -> usize {
    pick_index(&mut rand::rng(), active)
}
