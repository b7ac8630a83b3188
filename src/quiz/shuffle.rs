use rand::Rng;

/// Return a uniformly random permutation of `items`, leaving the input untouched
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Fisher–Yates over a copy of `items` using the supplied generator
pub fn shuffle_with<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}
