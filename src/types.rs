use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Index into per-color tables: white = 0, black = 1
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

/// The two sliding movement patterns backed by a magic table. A queen is the
/// union of both.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Bishop, Slider::Rook];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit steps as (rank delta, file delta)
    pub const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
            Slider::Rook => [(1, 0), (-1, 0), (0, 1), (0, -1)],
        }
    }

    pub fn piece_type(self) -> PieceType {
        match self {
            Slider::Bishop => PieceType::Bishop,
            Slider::Rook => PieceType::Rook,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.piece_type().to_human())
    }
}
