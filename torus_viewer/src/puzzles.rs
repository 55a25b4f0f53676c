// puzzles.rs - Preset boards and the random generator that feeds the container

use rand::Rng;
use torus_core::{Direction, LogicalGrid, PieceColor, Result};

pub struct Preset {
    pub name: &'static str,
    pub rows: &'static [&'static str],
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Tricolor 3x3",
        rows: &["RGB", "GBR", "BRG"],
    },
    Preset {
        name: "Stripes 4x4",
        rows: &["RRRR", "GGGG", "BBBB", "YYYY"],
    },
    Preset {
        name: "Checker 5x5",
        rows: &["RBRBR", "BRBRB", "RBRBR", "BRBRB", "RBRBR"],
    },
    Preset {
        name: "Rainbow 5x4",
        rows: &["RGBYP", "GBYPR", "BYPRG", "YPRGB"],
    },
    Preset {
        name: "Ribbon 6x1",
        rows: &["RGBYPR"],
    },
];

pub fn preset_grid(preset: &Preset) -> Result<LogicalGrid> {
    LogicalGrid::parse_rows(preset.rows)
}

pub fn random_grid(columns: usize, rows: usize, rng: &mut impl Rng) -> Result<LogicalGrid> {
    LogicalGrid::from_fn(columns, rows, |_, _| {
        PieceColor::ALL[rng.gen_range(0..PieceColor::ALL.len())]
    })
}

/// Applies `moves` random wrap-around slides to `grid`.
pub fn scramble(grid: &LogicalGrid, moves: usize, rng: &mut impl Rng) -> Result<LogicalGrid> {
    const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    let mut scrambled = grid.clone();
    for _ in 0..moves {
        let direction = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
        let column = rng.gen_range(0..grid.columns());
        let row = rng.gen_range(0..grid.rows());
        scrambled = scrambled.shifted(direction, column, row)?;
    }
    Ok(scrambled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_preset_parses() {
        for preset in PRESETS {
            assert!(preset_grid(preset).is_ok(), "{} failed to parse", preset.name);
        }
    }

    #[test]
    fn scramble_keeps_color_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = preset_grid(&PRESETS[3]).unwrap();
        let scrambled = scramble(&grid, 25, &mut rng).unwrap();

        let count = |g: &LogicalGrid, color| {
            (0..g.columns())
                .flat_map(|c| (0..g.rows()).map(move |r| (c, r)))
                .filter(|&cell| g[cell] == color)
                .count()
        };
        for color in PieceColor::ALL {
            assert_eq!(count(&grid, color), count(&scrambled, color));
        }
    }

    #[test]
    fn random_grid_has_requested_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = random_grid(4, 2, &mut rng).unwrap();
        assert_eq!((grid.columns(), grid.rows()), (4, 2));
    }
}
