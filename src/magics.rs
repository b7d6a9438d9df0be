//! Magic bitboards for sliding piece attacks.
//!
//! For every square and slider the relevant occupancy is hashed with a
//! multiplicative "magic" into a dense bucket. Buckets do not hold attack sets
//! directly: each square keeps only its distinct attack sets in a shared
//! per-slider store, and a byte-sized index table maps buckets into it.
//!
//! ```text
//! bucket     = ((occupied & mask) * magic) >> shift
//! compressed = indices[index_base + bucket]
//! attacks    = store[offset + compressed]
//! ```
//!
//! Tables are built once and only read afterwards. Every build replays all
//! occupancy subsets against [`sliding_attacks`] before it returns, so a bad
//! magic fails loudly instead of producing wrong attack sets.

use crate::bitboard::{ray_length, sliding_attacks, subsets, Geometry};
use crate::error::{BuildError, BuildResult};
use crate::types::Slider;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Seed of the deterministic magic search
pub const DEFAULT_MAGIC_SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// Candidates tried per square before the search gives up
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1 << 26;

/// Marks a bucket no occupancy has reached yet
const UNUSED: u8 = u8::MAX;

/// Number of distinct attack sets a slider can have on `sq`.
///
/// Along each ray the attack set ends on one of the ray's squares, so a ray of
/// length n contributes n choices (an empty ray contributes 1).
pub fn distinct_patterns(slider: Slider, sq: u8) -> usize {
    slider
        .directions()
        .iter()
        .map(|&(dr, df)| ray_length(sq, dr, df).max(1))
        .product()
}

/// Capacity a square's list of distinct attack sets needs
pub fn max_distinct_patterns(slider: Slider) -> usize {
    (0..64u8)
        .map(|sq| distinct_patterns(slider, sq))
        .max()
        .unwrap_or(0)
}

/// Size of the shared attack store of a slider
pub fn attack_store_len(slider: Slider) -> usize {
    (0..64u8).map(|sq| distinct_patterns(slider, sq)).sum()
}

/// Parameters of the magic search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicConfig {
    pub seed: u64,
    pub max_attempts: u64,
}

impl Default for MagicConfig {
    fn default() -> Self {
        MagicConfig {
            seed: DEFAULT_MAGIC_SEED,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Magic multipliers for both sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magics {
    pub bishop: [u64; 64],
    pub rook: [u64; 64],
}

impl Magics {
    pub fn get(&self, slider: Slider) -> &[u64; 64] {
        match slider {
            Slider::Bishop => &self.bishop,
            Slider::Rook => &self.rook,
        }
    }

    fn get_mut(&mut self, slider: Slider) -> &mut [u64; 64] {
        match slider {
            Slider::Bishop => &mut self.bishop,
            Slider::Rook => &mut self.rook,
        }
    }

    /// Search a collision-free multiplier for every square of both sliders
    pub fn search(geometry: &Geometry, config: &MagicConfig) -> BuildResult<Magics> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut magics = Magics {
            bishop: [0; 64],
            rook: [0; 64],
        };

        for slider in Slider::ALL {
            let start = Instant::now();
            for sq in 0..64u8 {
                let mask = geometry.relevance_mask(slider, sq);
                magics.get_mut(slider)[sq as usize] =
                    find_magic(slider, sq, mask, &mut rng, config.max_attempts)?;
            }
            debug!(%slider, elapsed = ?start.elapsed(), "found magics");
        }
        Ok(magics)
    }
}

/// Try sparse random multipliers until one maps every occupancy of `mask` to a
/// bucket that is either fresh or already holds the same attack set.
fn find_magic(
    slider: Slider,
    sq: u8,
    mask: u64,
    rng: &mut StdRng,
    max_attempts: u64,
) -> BuildResult<u64> {
    let shift = 64 - mask.count_ones();
    let size = 1usize << mask.count_ones();

    let occupancies: Vec<u64> = subsets(mask).collect();
    let attacks: Vec<u64> = occupancies
        .iter()
        .map(|&occ| sliding_attacks(slider, sq, occ))
        .collect();

    // A bucket is live for the attempt stamped into `epoch`, so nothing is
    // cleared between candidates.
    let mut used = vec![0u64; size];
    let mut epoch = vec![0u64; size];

    for attempt in 1..=max_attempts {
        let candidate = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();

        // Want at least 6 bits in the upper byte of candidate * mask
        if (candidate.wrapping_mul(mask) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        let collides = occupancies.iter().zip(&attacks).any(|(&occ, &attack)| {
            let idx = (occ.wrapping_mul(candidate) >> shift) as usize;
            if epoch[idx] != attempt {
                epoch[idx] = attempt;
                used[idx] = attack;
                false
            } else {
                used[idx] != attack
            }
        });

        if !collides {
            return Ok(candidate);
        }
    }

    Err(BuildError::MagicNotFound {
        slider,
        square: sq,
        attempts: max_attempts,
    })
}

/// Lookup parameters of one square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MagicEntry {
    /// Relevant occupancy
    pub mask: u64,
    pub magic: u64,
    /// 64 minus the number of relevant squares
    pub shift: u8,
    /// First distinct attack set of this square in the shared store
    pub offset: usize,
    /// First bucket of this square in the index table
    pub index_base: usize,
}

impl MagicEntry {
    #[inline(always)]
    pub fn bucket(&self, occupied: u64) -> usize {
        ((occupied & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// All lookup data of one slider
#[derive(Clone, PartialEq, Eq)]
struct SliderTable {
    entries: [MagicEntry; 64],
    /// Bucket -> position in the square's run of distinct attack sets
    indices: Vec<u8>,
    /// Distinct attack sets of all squares, square by square
    attacks: Vec<u64>,
}

impl SliderTable {
    fn build(geometry: &Geometry, slider: Slider, magics: &[u64; 64]) -> BuildResult<Self> {
        let mut table = SliderTable {
            entries: [MagicEntry::default(); 64],
            indices: Vec::new(),
            attacks: Vec::with_capacity(attack_store_len(slider)),
        };

        let mut offset = 0;
        for sq in 0..64u8 {
            let mask = geometry.relevance_mask(slider, sq);
            let entry = MagicEntry {
                mask,
                magic: magics[sq as usize],
                shift: (64 - mask.count_ones()) as u8,
                offset,
                index_base: table.indices.len(),
            };
            table.fill_square(slider, sq, entry)?;
            table.entries[sq as usize] = entry;
            table.verify_square(slider, sq)?;
            offset += distinct_patterns(slider, sq);
        }

        Ok(table)
    }

    /// Append the index run and the distinct attack sets of one square
    fn fill_square(&mut self, slider: Slider, sq: u8, entry: MagicEntry) -> BuildResult<()> {
        let capacity = distinct_patterns(slider, sq);
        if capacity >= UNUSED as usize {
            return Err(BuildError::PatternOverflow {
                slider,
                square: sq,
                capacity: UNUSED as usize - 1,
            });
        }

        let buckets = 1usize << entry.mask.count_ones();
        self.indices.resize(entry.index_base + buckets, UNUSED);
        let mut distinct: Vec<u64> = Vec::with_capacity(capacity);

        for occupied in subsets(entry.mask) {
            let attack = sliding_attacks(slider, sq, occupied);
            let compressed: u8 = match distinct.iter().position(|&a| a == attack) {
                Some(i) => i as u8,
                None if distinct.len() < capacity => {
                    distinct.push(attack);
                    (distinct.len() - 1) as u8
                }
                None => {
                    return Err(BuildError::PatternOverflow {
                        slider,
                        square: sq,
                        capacity,
                    })
                }
            };

            let bucket = entry.bucket(occupied);
            let slot = &mut self.indices[entry.index_base + bucket];
            if *slot == UNUSED {
                *slot = compressed;
            } else if *slot != compressed {
                return Err(BuildError::MagicCollision {
                    slider,
                    square: sq,
                    bucket,
                });
            }
        }

        if distinct.len() != capacity {
            return Err(BuildError::PatternCount {
                slider,
                square: sq,
                expected: capacity,
                found: distinct.len(),
            });
        }

        // Unreached buckets still have to point inside the square's run
        for slot in &mut self.indices[entry.index_base..] {
            if *slot == UNUSED {
                *slot = 0;
            }
        }

        debug_assert_eq!(self.attacks.len(), entry.offset);
        self.attacks.extend_from_slice(&distinct);
        Ok(())
    }

    #[inline(always)]
    fn lookup(&self, sq: u8, occupied: u64) -> u64 {
        let entry = &self.entries[sq as usize];
        let compressed = self.indices[entry.index_base + entry.bucket(occupied)] as usize;
        self.attacks[entry.offset + compressed]
    }

    /// Replay every occupancy of the square through the lookup path. Squares
    /// outside the mask are also set once to check they are ignored.
    fn verify_square(&self, slider: Slider, sq: u8) -> BuildResult<()> {
        let mask = self.entries[sq as usize].mask;
        for subset in subsets(mask) {
            let expected = sliding_attacks(slider, sq, subset);
            for occupied in [subset, subset | !mask] {
                let found = self.lookup(sq, occupied);
                if found != expected {
                    return Err(BuildError::VerificationFailed {
                        slider,
                        square: sq,
                        occupancy: occupied,
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Magic bitboard attack lookup tables for bishops and rooks
#[derive(Clone, PartialEq, Eq)]
pub struct MagicTables {
    tables: [SliderTable; 2],
}

impl MagicTables {
    /// Search magics with the default seed and build the tables
    pub fn build(geometry: &Geometry) -> BuildResult<Self> {
        Self::build_configured(geometry, &MagicConfig::default())
    }

    pub fn build_configured(geometry: &Geometry, config: &MagicConfig) -> BuildResult<Self> {
        let magics = Magics::search(geometry, config)?;
        Self::build_with(geometry, &magics)
    }

    /// Build the tables from supplied multipliers, rejecting any that alias two
    /// different attack sets into one bucket
    pub fn build_with(geometry: &Geometry, magics: &Magics) -> BuildResult<Self> {
        let start = Instant::now();
        let bishop = SliderTable::build(geometry, Slider::Bishop, &magics.bishop)?;
        debug!(
            slider = %Slider::Bishop,
            attacks = bishop.attacks.len(),
            buckets = bishop.indices.len(),
            "built slider table"
        );
        let rook = SliderTable::build(geometry, Slider::Rook, &magics.rook)?;
        debug!(
            slider = %Slider::Rook,
            attacks = rook.attacks.len(),
            buckets = rook.indices.len(),
            "built slider table"
        );

        let tables = MagicTables {
            tables: [bishop, rook],
        };
        info!(
            elapsed = ?start.elapsed(),
            bytes = tables.size_in_bytes(),
            "magic tables ready"
        );
        Ok(tables)
    }

    /// Attacks of `slider` from `sq` with the given board occupancy
    #[inline(always)]
    pub fn attacks(&self, slider: Slider, occupied: u64, sq: u8) -> u64 {
        self.tables[slider.index()].lookup(sq, occupied)
    }

    /// Get bishop attacks using magic lookup
    #[inline(always)]
    pub fn bishop_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.tables[Slider::Bishop.index()].lookup(sq, occupied)
    }

    /// Get rook attacks using magic lookup
    #[inline(always)]
    pub fn rook_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.tables[Slider::Rook.index()].lookup(sq, occupied)
    }

    /// Get queen attacks (combines bishop and rook)
    #[inline(always)]
    pub fn queen_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.bishop_attacks(sq, occupied) | self.rook_attacks(sq, occupied)
    }

    pub fn entry(&self, slider: Slider, sq: u8) -> &MagicEntry {
        &self.tables[slider.index()].entries[sq as usize]
    }

    /// The multipliers in use, e.g. to rebuild identical tables with [`MagicTables::build_with`]
    pub fn magics(&self) -> Magics {
        let mut magics = Magics {
            bishop: [0; 64],
            rook: [0; 64],
        };
        for slider in Slider::ALL {
            for (sq, entry) in self.tables[slider.index()].entries.iter().enumerate() {
                magics.get_mut(slider)[sq] = entry.magic;
            }
        }
        magics
    }

    /// Distinct attack sets of a slider, square by square
    pub fn attack_store(&self, slider: Slider) -> &[u64] {
        &self.tables[slider.index()].attacks
    }

    /// Bucket-to-attack-set indices of a slider, square by square
    pub fn index_table(&self, slider: Slider) -> &[u8] {
        &self.tables[slider.index()].indices
    }

    pub fn size_in_bytes(&self) -> usize {
        self.tables
            .iter()
            .map(|t| {
                t.attacks.len() * std::mem::size_of::<u64>()
                    + t.indices.len()
                    + std::mem::size_of_val(&t.entries)
            })
            .sum()
    }

    /// Compare every lookup against ray tracing, squares in parallel
    pub fn verify(&self, geometry: &Geometry) -> BuildResult<()> {
        Slider::ALL.par_iter().try_for_each(|&slider| {
            (0..64u8).into_par_iter().try_for_each(|sq| {
                let mask = geometry.relevance_mask(slider, sq);
                let built = self.entry(slider, sq).mask;
                if built != mask {
                    return Err(BuildError::MaskMismatch {
                        slider,
                        square: sq,
                        expected: mask,
                        found: built,
                    });
                }
                self.tables[slider.index()].verify_square(slider, sq)
            })
        })
    }
}

impl std::fmt::Debug for MagicTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagicTables")
            .field("bishop_attacks", &self.tables[0].attacks.len())
            .field("rook_attacks", &self.tables[1].attacks.len())
            .field("bytes", &self.size_in_bytes())
            .finish()
    }
}
