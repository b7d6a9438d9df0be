//! Late move reduction table.
//!
//! `l = ln(depth + 1) * ln(move_count + 1)` is mapped through one of two curves:
//! improving nodes use `l / 2`, the others use `0.25 + l / 1.5`. A curve value
//! below 1.0 gives no reduction, anything else is rounded half up. Non-PV nodes
//! are reduced one ply more than PV nodes.

/// Depths and move counts at or above this are clamped to the last entry
pub const MAX_PLY: usize = 64;

#[derive(Clone, PartialEq, Eq)]
pub struct ReductionTable {
    /// table[pv][improving][depth][move_count]
    table: [[[[u8; MAX_PLY]; MAX_PLY]; 2]; 2],
}

fn round_reduction(r: f64) -> u8 {
    if r >= 1.0 {
        (r + 0.5) as u8
    } else {
        0
    }
}

impl ReductionTable {
    pub fn new() -> Self {
        let mut table = [[[[0u8; MAX_PLY]; MAX_PLY]; 2]; 2];

        for depth in 0..MAX_PLY {
            for moves in 0..MAX_PLY {
                let l = ((depth + 1) as f64).ln() * ((moves + 1) as f64).ln();
                let gentle = round_reduction(l / 2.0);
                let steep = round_reduction(0.25 + l / 1.5);

                table[1][0][depth][moves] = steep;
                table[1][1][depth][moves] = gentle;
                table[0][0][depth][moves] = steep + 1;
                table[0][1][depth][moves] = gentle + 1;
            }
        }

        ReductionTable { table }
    }

    /// Plies to reduce a move searched at `depth` as the `move_count`th move of its node
    #[inline(always)]
    pub fn get(&self, pv: bool, improving: bool, depth: usize, move_count: usize) -> u8 {
        let depth = depth.min(MAX_PLY - 1);
        let move_count = move_count.min(MAX_PLY - 1);
        self.table[pv as usize][improving as usize][depth][move_count]
    }
}

impl Default for ReductionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReductionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReductionTable")
            .field("max", &self.get(false, false, MAX_PLY - 1, MAX_PLY - 1))
            .finish()
    }
}
