//! Dice notation
//!
//! Parses and rolls notation like "2d6+3", "1d20", "4d6-2". Every roll takes
//! the random source explicitly so callers can seed it.

use rand::Rng;
use std::str::FromStr;

/// Errors from parsing dice notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("missing 'd' in dice notation: {0}")]
    MissingSeparator(String),

    #[error("invalid dice count: {0}")]
    InvalidCount(String),

    #[error("invalid die sides: {0}")]
    InvalidSides(String),

    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
}

/// A parsed dice roll specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

/// Narrow a widened total, saturating at the `i32` bounds
fn saturate(total: i64) -> i32 {
    total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl DiceRoll {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll with the given random source and return the total
    pub fn roll_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let sum: i64 = (0..self.count)
            .map(|_| i64::from(roll_die_with(&mut *rng, self.sides)))
            .sum();
        saturate(sum + i64::from(self.modifier))
    }

    /// Roll with the thread-local generator
    pub fn roll(&self) -> i32 {
        self.roll_with(&mut rand::rng())
    }

    /// Minimum possible result
    pub fn min(&self) -> i32 {
        saturate(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Maximum possible result
    pub fn max(&self) -> i32 {
        saturate(i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier))
    }

    /// Expected average, rounded down
    pub fn average(&self) -> i32 {
        let avg_per_die = (1.0 + self.sides as f64) / 2.0;
        (self.count as f64 * avg_per_die + self.modifier as f64).floor() as i32
    }
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            m if m > 0 => write!(f, "{}d{}+{}", self.count, self.sides, m),
            m if m < 0 => write!(f, "{}d{}{}", self.count, self.sides, m),
            _ => write!(f, "{}d{}", self.count, self.sides),
        }
    }
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, DiceError> {
    // "17d10 + 85" appears in real data
    let compact: String = notation
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let (count_str, rest) = compact
        .split_once('d')
        .ok_or_else(|| DiceError::MissingSeparator(notation.to_string()))?;

    let count: u32 = if count_str.is_empty() {
        1
    } else {
        count_str
            .parse()
            .map_err(|_| DiceError::InvalidCount(count_str.to_string()))?
    };
    if count == 0 {
        return Err(DiceError::InvalidCount(count_str.to_string()));
    }

    let (sides_str, modifier) = match rest.find(['+', '-']) {
        Some(pos) => {
            let mod_str = &rest[pos..];
            let modifier: i32 = mod_str
                .trim_start_matches('+')
                .parse()
                .map_err(|_| DiceError::InvalidModifier(mod_str.to_string()))?;
            (&rest[..pos], modifier)
        }
        None => (rest, 0),
    };

    let sides: u32 = sides_str
        .parse()
        .map_err(|_| DiceError::InvalidSides(sides_str.to_string()))?;
    if sides == 0 {
        return Err(DiceError::InvalidSides(sides_str.to_string()));
    }

    Ok(DiceRoll::new(count, sides, modifier))
}

/// Roll one die with `sides` faces, 1..=sides
pub fn roll_die_with<R: Rng + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    rng.random_range(1..=sides.max(1))
}

/// Roll a single d20
pub fn roll_d20_with<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    roll_die_with(rng, 20)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_basic() {
        let roll = parse_dice("2d6").unwrap();
        assert_eq!(roll, DiceRoll::new(2, 6, 0));
    }

    #[test]
    fn test_parse_with_modifiers() {
        assert_eq!(parse_dice("1d20+5").unwrap(), DiceRoll::new(1, 20, 5));
        assert_eq!(parse_dice("3d8-2").unwrap(), DiceRoll::new(3, 8, -2));
        assert_eq!(parse_dice("17d10 + 85").unwrap(), DiceRoll::new(17, 10, 85));
    }

    #[test]
    fn test_parse_implicit_one_and_case() {
        assert_eq!(parse_dice("d6").unwrap(), DiceRoll::new(1, 6, 0));
        assert_eq!(parse_dice("  2D6+1 ").unwrap(), DiceRoll::new(2, 6, 1));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_dice("abc"), Err(DiceError::MissingSeparator(_))));
        assert!(matches!(parse_dice("2d"), Err(DiceError::InvalidSides(_))));
        assert!(matches!(parse_dice("0d6"), Err(DiceError::InvalidCount(_))));
        assert!(matches!(parse_dice("2d0"), Err(DiceError::InvalidSides(_))));
        assert!(matches!(parse_dice("2d6+x"), Err(DiceError::InvalidModifier(_))));
    }

    #[test]
    fn test_roll_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let roll = DiceRoll::new(2, 6, 3);
        for _ in 0..200 {
            let result = roll.roll_with(&mut rng);
            assert!((roll.min()..=roll.max()).contains(&result));
        }
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let roll = DiceRoll::new(4, 6, 0);
        let a: Vec<i32> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| roll.roll_with(&mut rng)).collect()
        };
        let b: Vec<i32> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| roll.roll_with(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_low_rolls_stub() {
        let mut rng = testing::LowRolls;
        assert_eq!(roll_die_with(&mut rng, 6), 1);
        assert_eq!(DiceRoll::new(3, 8, 2).roll_with(&mut rng), 5);
    }

    #[test]
    fn test_min_max_average() {
        let roll = DiceRoll::new(2, 6, 3);
        assert_eq!(roll.min(), 5);
        assert_eq!(roll.max(), 15);
        assert_eq!(roll.average(), 10);
        assert_eq!(DiceRoll::new(2, 6, 0).average(), 7);
        assert_eq!(DiceRoll::new(1, 8, 0).average(), 4);
        assert_eq!(DiceRoll::new(1, 4, -3).average(), -1);
    }

    #[test]
    fn test_huge_dice_saturate() {
        let roll = parse_dice("100000d100000").unwrap();
        assert_eq!(roll.min(), 100_000);
        assert_eq!(roll.max(), i32::MAX);

        let roll = DiceRoll::new(u32::MAX, u32::MAX, i32::MAX);
        assert_eq!(roll.min(), i32::MAX);
        assert_eq!(roll.max(), i32::MAX);
        assert_eq!(DiceRoll::new(1, 6, i32::MIN).max(), i32::MIN + 6);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceRoll::new(2, 6, 0).to_string(), "2d6");
        assert_eq!(DiceRoll::new(1, 20, 5).to_string(), "1d20+5");
        assert_eq!(DiceRoll::new(3, 8, -2).to_string(), "3d8-2");
    }
}
