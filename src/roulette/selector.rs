use rand::Rng;
use crate::models::restaurant::Restaurant;

/// Uniformly picks one restaurant with a single draw over the index range.
///
/// Callers are expected to check for an empty list first and report
/// "no matching restaurant" themselves; `None` only guards the precondition.
pub fn pick_random<'a, R: Rng + ?Sized>(
    restaurants: &'a [Restaurant],
    rng: &mut R,
) -> Option<&'a Restaurant> {
    if restaurants.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..restaurants.len());
    restaurants.get(index)
}
