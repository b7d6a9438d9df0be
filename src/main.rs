//! Build and inspect the attack tables.
//!
//! Usage: cargo run --release -- attacks --piece rook --square d4 --blockers d3,e6

use std::time::Instant;

use attack_tables::bitboard::{draw, parse_square, sq_to_bb, square_name, BitboardIter, Geometry};
use attack_tables::magics::{MagicConfig, DEFAULT_MAGIC_SEED};
use attack_tables::reduction::ReductionTable;
use attack_tables::types::{Color, PieceType, Slider};
use attack_tables::Tables;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "attack_tables")]
#[command(about = "Build and query precomputed chess attack tables")]
struct Args {
    /// Log build details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed of the magic multiplier search
    #[arg(long, global = true, default_value_t = DEFAULT_MAGIC_SEED)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print table sizes and build time
    Stats,
    /// Print the attack set of a piece
    Attacks {
        #[arg(long, value_enum)]
        piece: Piece,

        /// Square in algebraic notation, e.g. d4
        #[arg(long)]
        square: String,

        /// Occupancy as a number, e.g. 0x0000100000040000
        #[arg(long)]
        occupancy: Option<String>,

        /// Comma separated occupied squares, e.g. c3,g7
        #[arg(long, value_delimiter = ',')]
        blockers: Vec<String>,

        /// Side of the pawn
        #[arg(long, default_value = "w")]
        color: char,
    },
    /// Compare every lookup against ray tracing
    Verify,
    /// Print the magic multipliers as Rust arrays
    Magics,
    /// Print the squares strictly between two squares
    Between { from: String, to: String },
    /// Print a late move reduction
    Reduction {
        #[arg(long)]
        pv: bool,
        #[arg(long)]
        improving: bool,
        #[arg(long)]
        depth: usize,
        #[arg(long)]
        moves: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<Piece> for PieceType {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::Pawn => PieceType::Pawn,
            Piece::Knight => PieceType::Knight,
            Piece::Bishop => PieceType::Bishop,
            Piece::Rook => PieceType::Rook,
            Piece::Queen => PieceType::Queen,
            Piece::King => PieceType::King,
        }
    }
}

fn square(name: &str) -> Result<u8> {
    parse_square(name).ok_or_else(|| eyre!("invalid square {name:?}"))
}

fn parse_occupancy(s: &str) -> Result<u64> {
    let value = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16)?,
        None => s.parse()?,
    };
    Ok(value)
}

fn load(seed: u64) -> Result<Tables> {
    let config = MagicConfig {
        seed,
        ..MagicConfig::default()
    };
    Ok(Tables::load_configured(&config)?)
}

fn print_bitboard(bb: u64) {
    println!("{} ({:#018x})", bb, bb);
    println!("{}", BitboardIter(bb).map(square_name).join(" "));
    print!("{}", draw(bb));
}

fn print_magics(name: &str, magics: &[u64; 64]) {
    println!("pub const {}: [u64; 64] = [", name);
    for row in magics.chunks(4) {
        println!("    {},", row.iter().map(|m| format!("{:#018x}", m)).join(", "));
    }
    println!("];");
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match args.command {
        Command::Stats => {
            let start = Instant::now();
            let tables = load(args.seed)?;
            let elapsed = start.elapsed();
            println!("Built tables in {:?}", elapsed);
            for slider in Slider::ALL {
                println!(
                    "  {:<6} {:>5} distinct attack sets, {:>6} buckets",
                    slider.to_string(),
                    tables.magics.attack_store(slider).len(),
                    tables.magics.index_table(slider).len()
                );
            }
            println!("  {} bytes of magic tables", tables.magics.size_in_bytes());
        }
        Command::Attacks {
            piece,
            square: name,
            occupancy,
            blockers,
            color,
        } => {
            let sq = square(&name)?;
            let mut occupied = match occupancy {
                Some(s) => parse_occupancy(&s)?,
                None => 0,
            };
            for blocker in &blockers {
                occupied |= sq_to_bb(square(blocker)?);
            }
            let color = Color::from_char(color).ok_or_else(|| eyre!("color must be `w` or `b`"))?;

            let tables = load(args.seed)?;
            let piece = PieceType::from(piece);
            println!("{} {} on {}", color.to_human(), piece.to_human(), name);
            print_bitboard(tables.piece_attacks(piece, color, sq, occupied));
        }
        Command::Verify => {
            let tables = load(args.seed)?;
            let start = Instant::now();
            tables.magics.verify(&tables.geometry)?;
            println!("All lookups match ray tracing ({:?})", start.elapsed());
        }
        Command::Magics => {
            let tables = load(args.seed)?;
            let magics = tables.magics.magics();
            print_magics("BISHOP_MAGICS", &magics.bishop);
            println!();
            print_magics("ROOK_MAGICS", &magics.rook);
        }
        Command::Between { from, to } => {
            let (a, b) = (square(&from)?, square(&to)?);
            print_bitboard(Geometry::load().between(a, b));
        }
        Command::Reduction {
            pv,
            improving,
            depth,
            moves,
        } => {
            println!("{}", ReductionTable::new().get(pv, improving, depth, moves));
        }
    }

    Ok(())
}
