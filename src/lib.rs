//! Precomputed attack tables for a bitboard chess engine.
//!
//! [`Tables::load`] derives the static board geometry and then the magic
//! lookup tables for sliding pieces. Both are built once, before any query,
//! and are only read afterwards, so a `&Tables` can be shared freely between
//! search threads.

pub mod bitboard;
pub mod error;
pub mod magics;
pub mod reduction;
pub mod types;

use bitboard::Geometry;
use error::BuildResult;
use magics::{MagicConfig, MagicTables, Magics};
use once_cell::sync::OnceCell;
use types::{Color, PieceType, Slider};

pub use error::BuildError;

/// Geometry and magic tables, built in dependency order
#[derive(Debug)]
pub struct Tables {
    pub geometry: Geometry,
    pub magics: MagicTables,
}

impl Tables {
    pub fn load() -> BuildResult<Self> {
        Self::load_configured(&MagicConfig::default())
    }

    pub fn load_configured(config: &MagicConfig) -> BuildResult<Self> {
        let geometry = Geometry::load();
        let magics = MagicTables::build_configured(&geometry, config)?;
        Ok(Tables { geometry, magics })
    }

    /// Build with known multipliers instead of searching for them
    pub fn load_with(magics: &Magics) -> BuildResult<Self> {
        let geometry = Geometry::load();
        let magics = MagicTables::build_with(&geometry, magics)?;
        Ok(Tables { geometry, magics })
    }

    /// Attacks of `slider` from `sq` with the given board occupancy
    #[inline(always)]
    pub fn attacks(&self, slider: Slider, occupied: u64, sq: u8) -> u64 {
        self.magics.attacks(slider, occupied, sq)
    }

    /// Attacks of any piece type. Pawns attack in the direction of `color`.
    pub fn piece_attacks(&self, piece: PieceType, color: Color, sq: u8, occupied: u64) -> u64 {
        match piece {
            PieceType::Pawn => self.geometry.pawn_attacks(color, sq),
            PieceType::Knight => self.geometry.knight[sq as usize],
            PieceType::King => self.geometry.king[sq as usize],
            PieceType::Bishop => self.magics.bishop_attacks(sq, occupied),
            PieceType::Rook => self.magics.rook_attacks(sq, occupied),
            PieceType::Queen => self.magics.queen_attacks(sq, occupied),
        }
    }
}

static TABLES: OnceCell<Tables> = OnceCell::new();

/// Build the process-wide tables. Call once at startup, before any search
/// thread starts; later calls return the tables built by the first one.
pub fn init() -> BuildResult<&'static Tables> {
    TABLES.get_or_try_init(Tables::load)
}

/// The process-wide tables, if [`init`] has completed. Never builds anything.
#[inline]
pub fn global() -> Option<&'static Tables> {
    TABLES.get()
}
