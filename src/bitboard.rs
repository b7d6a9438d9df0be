//! Bitboard representation and the static board geometry tables.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
//! This corresponds to: square_index = (rank - 1) * 8 + (file - 1) where rank/file are 1-indexed.
//!
//! Everything in [`Geometry`] is a pure function of the 8x8 topology. It is built once by
//! [`Geometry::load`] and only read afterwards; the sliding relevance masks it holds are the
//! input of the magic tables in [`crate::magics`].

use crate::reduction::ReductionTable;
use crate::types::{Color, PieceType, Slider};
use itertools::iproduct;

/// Convert a 1-indexed rank and file to a square index (0-63)
#[inline(always)]
pub const fn pos_to_sq(rank: u8, file: u8) -> u8 {
    (rank - 1) * 8 + (file - 1)
}

/// Convert a square index to a bitboard with that single bit set
#[inline(always)]
pub const fn sq_to_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Get the rank (1-8) from a square index
#[inline(always)]
pub const fn sq_rank(sq: u8) -> u8 {
    (sq >> 3) + 1
}

/// Get the file (1-8) from a square index
#[inline(always)]
pub const fn sq_file(sq: u8) -> u8 {
    (sq & 7) + 1
}

#[inline(always)]
const fn rank_distance(a: u8, b: u8) -> u8 {
    (a >> 3).abs_diff(b >> 3)
}

#[inline(always)]
const fn file_distance(a: u8, b: u8) -> u8 {
    (a & 7).abs_diff(b & 7)
}

/// Parse a square in algebraic notation ("e4")
pub fn parse_square(s: &str) -> Option<u8> {
    match s.as_bytes() {
        [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Some(pos_to_sq(r - b'0', f - b'a' + 1)),
        _ => None,
    }
}

/// Algebraic name of a square ("e4")
pub fn square_name(sq: u8) -> String {
    format!(
        "{}{}",
        (b'a' + sq_file(sq) - 1) as char,
        (b'0' + sq_rank(sq)) as char
    )
}

/// Iterate over set bits in a bitboard, returning square indices
pub struct BitboardIter(pub u64);

impl Iterator for BitboardIter {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1; // Clear the lowest set bit
            Some(sq)
        }
    }
}

/// Every subset of `mask`, starting with the empty set, using the Carry-Rippler technique
pub fn subsets(mask: u64) -> impl Iterator<Item = u64> {
    let mut subset = 0u64;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let current = subset;
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            done = true;
        }
        Some(current)
    })
}

/// Render a bitboard as an 8x8 diagram, rank 8 on top
pub fn draw(bb: u64) -> String {
    let mut string = String::new();

    for r in (1..9).rev() {
        string.push((b'0' + r) as char);
        for f in 1..9 {
            let marker = if bb & sq_to_bb(pos_to_sq(r, f)) != 0 { "x" } else { "." };
            string = format!("{} {}", string, marker);
        }
        string.push('\n');
    }
    string.push_str("  a b c d e f g h\n");
    string
}

/// Trace the attack set of a slider by stepping one square at a time.
///
/// A ray stops at the board edge or on the first occupied square, which is included.
pub fn sliding_attacks(slider: Slider, sq: u8, occupied: u64) -> u64 {
    let rank = (sq >> 3) as i8;
    let file = (sq & 7) as i8;
    let mut attacks = 0u64;

    for (dr, df) in slider.directions() {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = 1u64 << (r * 8 + f);
            attacks |= target;
            if occupied & target != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Number of squares from `sq` to the board edge in direction (dr, df)
pub fn ray_length(sq: u8, dr: i8, df: i8) -> usize {
    let mut r = (sq >> 3) as i8 + dr;
    let mut f = (sq & 7) as i8 + df;
    let mut len = 0;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        len += 1;
        r += dr;
        f += df;
    }
    len
}

/// Apply index deltas from `sq`, keeping targets on the board within `max_step`
/// ranks and files of the origin. The distance check rejects wraparound across
/// the a- and h-files.
fn step_attacks(sq: u8, deltas: &[i8], max_step: u8) -> u64 {
    deltas
        .iter()
        .map(|&delta| sq as i8 + delta)
        .filter(|to| (0..64).contains(to))
        .map(|to| to as u8)
        .filter(|&to| rank_distance(sq, to) <= max_step && file_distance(sq, to) <= max_step)
        .fold(0, |bb, to| bb | sq_to_bb(to))
}

/// Squares strictly between two squares on a shared rank, file, or diagonal.
/// Unaligned and adjacent pairs give an empty set.
fn between_squares(a: u8, b: u8) -> u64 {
    let dr = (b >> 3) as i8 - (a >> 3) as i8;
    let df = (b & 7) as i8 - (a & 7) as i8;

    if a == b || !(dr == 0 || df == 0 || dr.abs() == df.abs()) {
        return 0;
    }

    let step = dr.signum() * 8 + df.signum();
    let mut between = 0u64;
    let mut s = a as i8 + step;
    while s != b as i8 {
        between |= 1u64 << s;
        s += step;
    }
    between
}

/// Compute bishop occupancy mask (excluding edges)
fn bishop_mask(sq: u8) -> u64 {
    let rank = (sq >> 3) as i32;
    let file = (sq & 7) as i32;
    let mut mask = 0u64;

    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while r > 0 && r < 7 && f > 0 && f < 7 {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Compute rook occupancy mask (excluding edges)
fn rook_mask(sq: u8) -> u64 {
    let rank = (sq >> 3) as i32;
    let file = (sq & 7) as i32;
    let mut mask = 0u64;

    // Rank ray (exclude edges)
    for f in 1..7 {
        if f != file {
            mask |= 1u64 << (rank * 8 + f);
        }
    }

    // File ray (exclude edges)
    for r in 1..7 {
        if r != rank {
            mask |= 1u64 << (r * 8 + file);
        }
    }
    mask
}

const KNIGHT_DELTAS: [i8; 8] = [17, 15, 10, 6, -6, -10, -15, -17];
const KING_DELTAS: [i8; 8] = [9, 8, 7, 1, -1, -7, -8, -9];
const PAWN_DELTAS: [[i8; 2]; 2] = [[7, 9], [-7, -9]];

/// Precomputed geometry tables, derived from board topology alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    /// Single square bitboards
    pub squares: [u64; 64],
    /// Rank masks, index 0 = rank 1
    pub ranks: [u64; 8],
    /// File masks, index 0 = a-file
    pub files: [u64; 8],
    pub knight: [u64; 64],
    pub king: [u64; 64],
    /// Pawn captures: pawn[color as usize][square]
    pub pawn: [[u64; 64]; 2],
    /// Every square within two king steps
    pub king_zone: [u64; 64],
    /// Bishop attacks on an empty board
    pub bishop_rays: [u64; 64],
    /// Rook attacks on an empty board
    pub rook_rays: [u64; 64],
    /// Bishop relevance masks (outer board edges trimmed)
    pub bishop_masks: [u64; 64],
    /// Rook relevance masks (outer board edges trimmed)
    pub rook_masks: [u64; 64],
    /// Squares strictly between two aligned squares: between[a][b]
    pub between: [[u64; 64]; 64],
    pub board_edges: u64,
    pub board_corners: u64,
    pub small_center: u64,
    pub big_center: u64,
    /// White = light squares, black = dark squares
    pub colored_squares: [u64; 2],
    /// Ranks a pawn of each color can capture from without promoting
    pub pawn_masks: [u64; 2],
    /// Pawn band that can capture towards the a-file
    pub pawn_mask_left: [u64; 2],
    /// Pawn band that can capture towards the h-file
    pub pawn_mask_right: [u64; 2],
    /// Queenside, center and kingside file groups
    pub pawn_majority: [u64; 3],
    /// Files around the king file, ranks 2-7, for pawn cover detection
    pub king_flanks: [u64; 8],
    /// Enemy pawn storm regions: king_pawn_storms[color][0 = kingside, 1 = queenside]
    pub king_pawn_storms: [[u64; 2]; 2],
    /// Files adjacent to each file
    pub neighbor_files: [u64; 8],
    /// All ranks strictly ahead of a square: front_regions[color][square]
    pub front_regions: [[u64; 64]; 2],
    /// Squares ahead on the same and adjacent files: passed_pawn_masks[color][square]
    pub passed_pawn_masks: [[u64; 64]; 2],
    pub reductions: ReductionTable,
}

impl Geometry {
    /// Derive every table from the board topology
    pub fn load() -> Self {
        let mut squares = [0u64; 64];
        for sq in 0..64u8 {
            squares[sq as usize] = sq_to_bb(sq);
        }

        let mut ranks = [0u64; 8];
        let mut files = [0u64; 8];
        for (r, f) in iproduct!(0..8usize, 0..8usize) {
            ranks[r] |= squares[r * 8 + f];
            files[f] |= squares[r * 8 + f];
        }

        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];
        let mut pawn = [[0u64; 64]; 2];
        let mut king_zone = [0u64; 64];
        let mut bishop_rays = [0u64; 64];
        let mut rook_rays = [0u64; 64];
        let mut bishop_masks = [0u64; 64];
        let mut rook_masks = [0u64; 64];

        let zone_deltas: Vec<i8> = iproduct!(-2i8..=2, -2i8..=2)
            .filter(|&(dr, df)| (dr, df) != (0, 0))
            .map(|(dr, df)| dr * 8 + df)
            .collect();

        for sq in 0..64u8 {
            let s = sq as usize;
            knight[s] = step_attacks(sq, &KNIGHT_DELTAS, 2);
            king[s] = step_attacks(sq, &KING_DELTAS, 1);
            king_zone[s] = step_attacks(sq, &zone_deltas, 2);
            for color in Color::ALL {
                pawn[color.index()][s] = step_attacks(sq, &PAWN_DELTAS[color.index()], 1);
            }
            bishop_rays[s] = sliding_attacks(Slider::Bishop, sq, 0);
            rook_rays[s] = sliding_attacks(Slider::Rook, sq, 0);
            bishop_masks[s] = bishop_mask(sq);
            rook_masks[s] = rook_mask(sq);
        }

        let mut between = [[0u64; 64]; 64];
        for (a, b) in iproduct!(0..64u8, 0..64u8) {
            between[a as usize][b as usize] = between_squares(a, b);
        }

        let board_edges = ranks[0] | ranks[7] | files[0] | files[7];
        let board_corners = squares[0] | squares[7] | squares[56] | squares[63];

        // c4-e5 and the c3-f6 block
        let small_center = iproduct!(4..=5u8, 3..=5u8)
            .fold(0, |bb, (r, f)| bb | sq_to_bb(pos_to_sq(r, f)));
        let big_center = iproduct!(3..=6u8, 3..=6u8)
            .fold(0, |bb, (r, f)| bb | sq_to_bb(pos_to_sq(r, f)));

        // a1 is dark
        let mut colored_squares = [0u64; 2];
        for sq in 0..64u8 {
            let dark = ((sq >> 3) + (sq & 7)) % 2 == 0;
            let color = if dark { Color::Black } else { Color::White };
            colored_squares[color.index()] |= sq_to_bb(sq);
        }

        let pawn_masks = [
            ranks[1] | ranks[2] | ranks[3] | ranks[4] | ranks[5],
            ranks[2] | ranks[3] | ranks[4] | ranks[5] | ranks[6],
        ];
        let pawn_mask_left = [pawn_masks[0] & !files[7], pawn_masks[1] & !files[7]];
        let pawn_mask_right = [pawn_masks[0] & !files[0], pawn_masks[1] & !files[0]];

        let pawn_majority = [
            files[0] | files[1] | files[2],
            files[3] | files[4],
            files[5] | files[6] | files[7],
        ];

        // Ranks 2-7. Masking ranks 1 and 7 instead would keep rank 8 and drop g7.
        let back_ranks = ranks[0] | ranks[7];
        let mut king_flanks = [0u64; 8];
        let mut neighbor_files = [0u64; 8];
        for f in 0..8usize {
            let reach = if (3..=4).contains(&f) { 2 } else { 1 };
            let lo = f.saturating_sub(reach);
            let hi = (f + reach).min(7);
            king_flanks[f] = (lo..=hi).fold(0, |bb, x| bb | files[x]) & !back_ranks;

            if f > 0 {
                neighbor_files[f] |= files[f - 1];
            }
            if f < 7 {
                neighbor_files[f] |= files[f + 1];
            }
        }

        // Closed file segments: rank 2-5 for white, rank 4-7 for black
        let segment = |file: u8, from: u8, to: u8| {
            let (a, b) = (pos_to_sq(from, file), pos_to_sq(to, file));
            between[a as usize][b as usize] | sq_to_bb(a) | sq_to_bb(b)
        };
        let storm = |cols: [u8; 3], from: u8, to: u8| {
            cols.iter().fold(0, |bb, &f| bb | segment(f, from, to))
        };
        let king_pawn_storms = [
            [storm([6, 7, 8], 2, 5), storm([1, 2, 3], 2, 5)],
            [storm([6, 7, 8], 7, 4), storm([1, 2, 3], 7, 4)],
        ];

        let mut front_regions = [[0u64; 64]; 2];
        let mut passed_pawn_masks = [[0u64; 64]; 2];
        for sq in 0..64u8 {
            let s = sq as usize;
            let rank = (sq >> 3) as usize;
            let file = (sq & 7) as usize;

            let ahead = (rank + 1..8).fold(0, |bb, r| bb | ranks[r]);
            let behind = (0..rank).fold(0, |bb, r| bb | ranks[r]);
            front_regions[Color::White.index()][s] = ahead;
            front_regions[Color::Black.index()][s] = behind;

            if back_ranks & squares[s] == 0 {
                let span = files[file] | neighbor_files[file];
                passed_pawn_masks[Color::White.index()][s] = span & ahead;
                passed_pawn_masks[Color::Black.index()][s] = span & behind;
            }
        }

        Geometry {
            squares,
            ranks,
            files,
            knight,
            king,
            pawn,
            king_zone,
            bishop_rays,
            rook_rays,
            bishop_masks,
            rook_masks,
            between,
            board_edges,
            board_corners,
            small_center,
            big_center,
            colored_squares,
            pawn_masks,
            pawn_mask_left,
            pawn_mask_right,
            pawn_majority,
            king_flanks,
            king_pawn_storms,
            neighbor_files,
            front_regions,
            passed_pawn_masks,
            reductions: ReductionTable::new(),
        }
    }

    /// Squares strictly between `a` and `b`, or 0 if they are not aligned
    #[inline(always)]
    pub fn between(&self, a: u8, b: u8) -> u64 {
        self.between[a as usize][b as usize]
    }

    /// Squares whose occupancy can change a slider's attacks from `sq`
    #[inline(always)]
    pub fn relevance_mask(&self, slider: Slider, sq: u8) -> u64 {
        match slider {
            Slider::Bishop => self.bishop_masks[sq as usize],
            Slider::Rook => self.rook_masks[sq as usize],
        }
    }

    #[inline(always)]
    pub fn pawn_attacks(&self, color: Color, sq: u8) -> u64 {
        self.pawn[color.index()][sq as usize]
    }

    /// Empty-board attacks of a piece, i.e. the squares from which it could check
    /// a king standing on `sq`. Pawns depend on color, see [`Geometry::pawn_attacks`].
    pub fn pseudo_attacks(&self, piece: PieceType, sq: u8) -> u64 {
        let s = sq as usize;
        match piece {
            PieceType::Pawn => 0,
            PieceType::Knight => self.knight[s],
            PieceType::Bishop => self.bishop_rays[s],
            PieceType::Rook => self.rook_rays[s],
            PieceType::Queen => self.bishop_rays[s] | self.rook_rays[s],
            PieceType::King => self.king[s],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(name: &str) -> u8 {
        parse_square(name).unwrap()
    }

    fn bb(names: &[&str]) -> u64 {
        names.iter().fold(0, |acc, n| acc | sq_to_bb(sq(n)))
    }

    #[test]
    fn test_square_names() {
        assert_eq!(sq("a1"), 0);
        assert_eq!(sq("h1"), 7);
        assert_eq!(sq("d4"), 27);
        assert_eq!(sq("h8"), 63);
        assert_eq!(square_name(27), "d4");
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("a10"), None);
    }

    #[test]
    fn test_ranks_and_files() {
        let g = Geometry::load();
        assert_eq!(g.ranks[0], 0xFF);
        assert_eq!(g.ranks[7], 0xFF00_0000_0000_0000);
        assert_eq!(g.files[0], 0x0101_0101_0101_0101);
        assert_eq!(g.files[7], 0x8080_8080_8080_8080);
        assert_eq!(g.board_edges.count_ones(), 28);
        assert_eq!(g.board_corners, bb(&["a1", "h1", "a8", "h8"]));
    }

    #[test]
    fn test_knight_corner() {
        // Knight on a1 should only attack b3 and c2
        let g = Geometry::load();
        assert_eq!(g.knight[sq("a1") as usize], bb(&["b3", "c2"]));
    }

    #[test]
    fn test_knight_attacks() {
        let g = Geometry::load();
        let attacks = g.knight[sq("e4") as usize];
        assert_eq!(attacks, bb(&["d2", "f2", "c3", "g3", "c5", "g5", "d6", "f6"]));

        // No wraparound from the h-file
        assert_eq!(g.knight[sq("h4") as usize], bb(&["g2", "f3", "f5", "g6"]));
    }

    #[test]
    fn test_king_attacks() {
        let g = Geometry::load();
        assert_eq!(g.king[sq("e4") as usize].count_ones(), 8);
        assert_eq!(g.king[sq("a1") as usize], bb(&["a2", "b1", "b2"]));
        assert_eq!(g.king[sq("h5") as usize], bb(&["g4", "h4", "g5", "g6", "h6"]));
    }

    #[test]
    fn test_pawn_attacks() {
        let g = Geometry::load();
        assert_eq!(g.pawn_attacks(Color::White, sq("e4")), bb(&["d5", "f5"]));
        assert_eq!(g.pawn_attacks(Color::Black, sq("e5")), bb(&["d4", "f4"]));
        assert_eq!(g.pawn_attacks(Color::White, sq("a2")), bb(&["b3"]));
        assert_eq!(g.pawn_attacks(Color::White, sq("h2")), bb(&["g3"]));
        assert_eq!(g.pawn_attacks(Color::Black, sq("h7")), bb(&["g6"]));
        assert_eq!(g.pawn_attacks(Color::White, sq("c8")), 0);
    }

    #[test]
    fn test_between() {
        let g = Geometry::load();
        assert_eq!(
            g.between(sq("a1"), sq("a8")),
            bb(&["a2", "a3", "a4", "a5", "a6", "a7"])
        );
        assert_eq!(g.between(sq("a1"), sq("b2")), 0);
        assert_eq!(g.between(sq("a1"), sq("b3")), 0);
        assert_eq!(g.between(sq("a1"), sq("a1")), 0);
        assert_eq!(g.between(sq("h1"), sq("a8")), g.between(sq("a8"), sq("h1")));
        assert_eq!(g.between(sq("c1"), sq("f4")), bb(&["d2", "e3"]));
        assert_eq!(g.between(sq("h3"), sq("b3")), bb(&["c3", "d3", "e3", "f3", "g3"]));
    }

    #[test]
    fn test_between_matches_ray_intersection() {
        let g = Geometry::load();
        for (a, b) in iproduct!(0..64u8, 0..64u8) {
            let expected = if a == b {
                0
            } else if g.bishop_rays[a as usize] & sq_to_bb(b) != 0 {
                sliding_attacks(Slider::Bishop, a, sq_to_bb(b))
                    & sliding_attacks(Slider::Bishop, b, sq_to_bb(a))
            } else if g.rook_rays[a as usize] & sq_to_bb(b) != 0 {
                sliding_attacks(Slider::Rook, a, sq_to_bb(b))
                    & sliding_attacks(Slider::Rook, b, sq_to_bb(a))
            } else {
                0
            };
            assert_eq!(g.between(a, b), expected, "between {} {}", a, b);
        }
    }

    #[test]
    fn test_relevance_masks() {
        let g = Geometry::load();
        assert_eq!(g.rook_masks[0].count_ones(), 12);
        assert_eq!(g.rook_masks[sq("d4") as usize].count_ones(), 10);
        assert_eq!(g.bishop_masks[0].count_ones(), 6);
        assert_eq!(g.bishop_masks[sq("d4") as usize].count_ones(), 9);
        for s in 0..64u8 {
            for slider in Slider::ALL {
                let mask = g.relevance_mask(slider, s);
                let rays = sliding_attacks(slider, s, 0);
                assert_eq!(mask & !rays, 0);
                assert_eq!(mask & sq_to_bb(s), 0);
                // Only the last square of each ray is trimmed
                let trimmed = (rays & !mask).count_ones() as usize;
                let live = slider
                    .directions()
                    .iter()
                    .filter(|&&(dr, df)| ray_length(s, dr, df) > 0)
                    .count();
                assert_eq!(trimmed, live, "{} on {}", slider, s);
            }
        }
    }

    #[test]
    fn test_sliding_attacks_blocked() {
        let occupied = bb(&["d3", "e6"]);
        let attacks = sliding_attacks(Slider::Rook, sq("d4"), occupied);
        assert_eq!(attacks & bb(&["d3", "d2"]), bb(&["d3"]));
        assert_eq!(attacks.count_ones(), 14 - 2);
    }

    #[test]
    fn test_subsets() {
        let mask = bb(&["b2", "c3", "g7"]);
        let all: Vec<u64> = subsets(mask).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], 0);
        assert!(all.iter().all(|s| s & !mask == 0));
        let mut sorted = all.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
        assert_eq!(subsets(0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_king_zone() {
        let g = Geometry::load();
        assert_eq!(g.king_zone[sq("e4") as usize].count_ones(), 24);
        assert_eq!(g.king_zone[sq("a1") as usize].count_ones(), 8);
        assert_eq!(g.king_zone[sq("h1") as usize] & g.files[0], 0);
    }

    #[test]
    fn test_colored_squares() {
        let g = Geometry::load();
        assert_eq!(g.colored_squares[Color::Black.index()] & sq_to_bb(sq("a1")), sq_to_bb(sq("a1")));
        assert_eq!(g.colored_squares[Color::White.index()] & sq_to_bb(sq("h1")), sq_to_bb(sq("h1")));
        assert_eq!(g.colored_squares[0] | g.colored_squares[1], u64::MAX);
        assert_eq!(g.colored_squares[0] & g.colored_squares[1], 0);
    }

    #[test]
    fn test_pawn_structure_masks() {
        let g = Geometry::load();
        assert_eq!(
            g.passed_pawn_masks[Color::White.index()][sq("e5") as usize],
            bb(&["d6", "e6", "f6", "d7", "e7", "f7", "d8", "e8", "f8"])
        );
        assert_eq!(
            g.passed_pawn_masks[Color::Black.index()][sq("a3") as usize],
            bb(&["a2", "b2", "a1", "b1"])
        );
        assert_eq!(g.passed_pawn_masks[Color::White.index()][sq("e1") as usize], 0);
        assert_eq!(g.front_regions[Color::White.index()][sq("b6") as usize], g.ranks[6] | g.ranks[7]);
        assert_eq!(g.front_regions[Color::Black.index()][sq("b1") as usize], 0);
        assert_eq!(g.neighbor_files[0], g.files[1]);
        assert_eq!(g.neighbor_files[4], g.files[3] | g.files[5]);
    }

    #[test]
    fn test_king_flanks_and_storms() {
        let g = Geometry::load();
        let inner = !(g.ranks[0] | g.ranks[7]);
        assert_eq!(g.king_flanks[0], (g.files[0] | g.files[1]) & inner);
        assert_eq!(g.king_flanks[3], (g.files[1] | g.files[2] | g.files[3] | g.files[4] | g.files[5]) & inner);
        assert_eq!(g.king_flanks[6], (g.files[5] | g.files[6] | g.files[7]) & inner);
        assert_ne!(g.king_flanks[6] & sq_to_bb(sq("g7")), 0);
        assert_eq!(g.king_flanks[6] & sq_to_bb(sq("g8")), 0);

        let white_kingside = g.king_pawn_storms[Color::White.index()][0];
        assert_eq!(white_kingside.count_ones(), 12);
        assert_eq!(white_kingside & sq_to_bb(sq("g2")), sq_to_bb(sq("g2")));
        assert_eq!(white_kingside & sq_to_bb(sq("g6")), 0);
        let black_queenside = g.king_pawn_storms[Color::Black.index()][1];
        assert_eq!(black_queenside & (g.ranks[3] | g.ranks[6]) & g.files[0], bb(&["a4", "a7"]));
    }

    #[test]
    fn test_center_and_pawn_masks() {
        let g = Geometry::load();
        assert_eq!(g.small_center, bb(&["c4", "c5", "d4", "d5", "e4", "e5"]));
        assert_eq!(g.big_center.count_ones(), 16);
        assert_eq!(g.big_center & g.small_center, g.small_center);
        assert_eq!(g.pawn_masks[Color::White.index()] & g.ranks[6], 0);
        assert_eq!(g.pawn_mask_left[0] & g.files[7], 0);
        assert_eq!(g.pawn_mask_right[1] & g.files[0], 0);
        assert_eq!(g.pawn_majority.iter().fold(0, |acc, m| acc | m), u64::MAX);
    }

    #[test]
    fn test_pseudo_attacks() {
        let g = Geometry::load();
        let d4 = sq("d4");
        assert_eq!(g.pseudo_attacks(PieceType::Bishop, d4), 9241705379636978241);
        assert_eq!(g.pseudo_attacks(PieceType::Rook, d4), 578721386714368008);
        assert_eq!(g.pseudo_attacks(PieceType::Queen, d4).count_ones(), 27);
        assert_eq!(g.pseudo_attacks(PieceType::Pawn, d4), 0);
    }

    #[test]
    fn test_draw() {
        let diagram = draw(sq_to_bb(sq("a1")) | sq_to_bb(sq("h8")));
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines[0], "8 . . . . . . . x");
        assert_eq!(lines[7], "1 x . . . . . . .");
        assert_eq!(lines[8], "  a b c d e f g h");
    }

    #[test]
    fn test_bitboard_iter() {
        let b = sq_to_bb(0) | sq_to_bb(7) | sq_to_bb(63); // a1, h1, h8
        let squares: Vec<u8> = BitboardIter(b).collect();
        assert_eq!(squares, vec![0, 7, 63]);
    }
}
