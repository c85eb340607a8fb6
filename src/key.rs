use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Serialize, Deserialize};

// Draws and key derivation read disjoint ChaCha streams of the same seed.
const DRAW_STREAM : u64 = 0;

const SPLIT_STREAM : u64 = 1;

/// Opaque, splittable random source. A key is a value: sampling with the same key and the
/// same parameters always yields the same draw, and independent draws require splitting
/// the key first. The caller owns the key lifecycle (usually splitting once per iteration
/// and once per parallel task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    seed : [u8; 32]
}

impl Key {

    pub fn new(seed : u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Key { seed : bytes }
    }

    pub fn from_bytes(seed : [u8; 32]) -> Self {
        Key { seed }
    }

    /// Derives two independent children.
    pub fn split(&self) -> (Key, Key) {
        let mut rng = self.split_rng();
        (Self::child(&mut rng), Self::child(&mut rng))
    }

    /// Derives n independent children. The first two children are the ones returned by split().
    pub fn split_n(&self, n : usize) -> Vec<Key> {
        let mut rng = self.split_rng();
        (0..n).map(|_| Self::child(&mut rng) ).collect()
    }

    /// Generator over this key's draw stream. Calling it twice replays the same sequence.
    pub fn rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(DRAW_STREAM);
        rng
    }

    fn split_rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(SPLIT_STREAM);
        rng
    }

    fn child(rng : &mut ChaCha8Rng) -> Key {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Key { seed : bytes }
    }

}
