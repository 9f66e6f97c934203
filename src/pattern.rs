//! Random pattern symbols.

use rand::RngCore;

/// Source of pattern symbols.
///
/// Every [`RngCore`] is a source, so a board can plug in
/// `rand::rngs::SmallRng` seeded from its own entropy.
pub trait PatternSource {
    /// Returns a symbol in `0..symbols`. `symbols` is never zero.
    fn next_symbol(&mut self, symbols: u8) -> u8;
}

impl<R: RngCore> PatternSource for R {
    fn next_symbol(&mut self, symbols: u8) -> u8 {
        (self.next_u32() % u32::from(symbols.max(1))) as u8
    }
}
