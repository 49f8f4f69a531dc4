//! Deterministic random streams for the fishing core.
//!
//! Every random decision goes through a [`RandomSource`]. Live play uses
//! [`FishingRng::from_user_seed`], which derives one `SmallRng` per domain so
//! that, for example, extra bite rolls never shift which fish gets selected.
//! Tests swap in [`ScriptedRandom`] to pin exact outcomes.

use std::fmt;

use hmac::{Hmac, Mac};
use num_traits::cast::cast;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: fmt::Debug {
    /// Next uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Number of draws served so far.
    fn draws(&self) -> u64 {
        0
    }

    /// Uniform integer in `[min, max]` built from a single draw.
    fn int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span_len = max - min;
        let span = f64::from(span_len) + 1.0;
        let offset = (self.next_f64() * span).floor();
        let offset = cast::<f64, u32>(offset).unwrap_or(0).min(span_len);
        min + offset
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore + fmt::Debug> RandomSource for CountingRng<R> {
    fn next_f64(&mut self) -> f64 {
        self.gen_range(0.0_f64..1.0)
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Build a scripted source. An empty script behaves like a constant `0.0`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Constant source returning `value` forever.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        }
    }

    fn draws(&self) -> u64 {
        cast::<usize, u64>(self.cursor).unwrap_or(u64::MAX)
    }
}

/// Deterministic bundle of random streams segregated by fishing domain.
pub struct FishingRng {
    bite: Box<dyn RandomSource>,
    hook: Box<dyn RandomSource>,
    selection: Box<dyn RandomSource>,
    struggle: Box<dyn RandomSource>,
}

impl fmt::Debug for FishingRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FishingRng")
            .field("bite_draws", &self.bite.draws())
            .field("hook_draws", &self.hook.draws())
            .field("selection_draws", &self.selection.draws())
            .field("struggle_draws", &self.struggle.draws())
            .finish()
    }
}

impl FishingRng {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            bite: Box::new(CountingRng::new(derive_stream_seed(seed, b"bite"))),
            hook: Box::new(CountingRng::new(derive_stream_seed(seed, b"hook"))),
            selection: Box::new(CountingRng::new(derive_stream_seed(seed, b"selection"))),
            struggle: Box::new(CountingRng::new(derive_stream_seed(seed, b"struggle"))),
        }
    }

    /// Every stream replays the same script. Useful for fully pinned tests.
    #[must_use]
    pub fn scripted(values: &[f64]) -> Self {
        Self::from_sources(
            Box::new(ScriptedRandom::new(values.to_vec())),
            Box::new(ScriptedRandom::new(values.to_vec())),
            Box::new(ScriptedRandom::new(values.to_vec())),
            Box::new(ScriptedRandom::new(values.to_vec())),
        )
    }

    /// Assemble a bundle from explicit sources.
    #[must_use]
    pub fn from_sources(
        bite: Box<dyn RandomSource>,
        hook: Box<dyn RandomSource>,
        selection: Box<dyn RandomSource>,
        struggle: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            bite,
            hook,
            selection,
            struggle,
        }
    }

    /// Replace the hook-roll stream, keeping the others.
    #[must_use]
    pub fn with_hook(mut self, hook: Box<dyn RandomSource>) -> Self {
        self.hook = hook;
        self
    }

    /// Replace the bite-delay stream, keeping the others.
    #[must_use]
    pub fn with_bite(mut self, bite: Box<dyn RandomSource>) -> Self {
        self.bite = bite;
        self
    }

    /// Access the bite-delay stream.
    pub fn bite(&mut self) -> &mut dyn RandomSource {
        self.bite.as_mut()
    }

    /// Access the hook-roll stream.
    pub fn hook(&mut self) -> &mut dyn RandomSource {
        self.hook.as_mut()
    }

    /// Access the species-selection stream.
    pub fn selection(&mut self) -> &mut dyn RandomSource {
        self.selection.as_mut()
    }

    /// Access the struggle-roll stream.
    pub fn struggle(&mut self) -> &mut dyn RandomSource {
        self.struggle.as_mut()
    }

    /// Total draws across every stream.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        [&self.bite, &self.hook, &self.selection, &self.struggle]
            .iter()
            .map(|stream| stream.draws())
            .fold(0_u64, u64::saturating_add)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed ^ 0x9E37_79B9_7F4A_7C15;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
