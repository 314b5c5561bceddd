//! Instruction decoding.
//!
//! The instruction alphabet is fixed. Every byte decodes to exactly one
//! [`Instruction`]; bytes outside the alphabet (including space and NUL)
//! decode to [`Instruction::Nop`] and act as pass-through cells.
//!
//! | Byte | Instruction |
//! |------|-------------|
//! | `>` `<` `v` `^` `X` | [`Instruction::Data`] |
//! | `~` `+` `-` `?` `!` `*` | [`Instruction::SetMode`] |
//! | `\` `/` `\|` | [`Instruction::Reflect`] |
//! | `#` | [`Instruction::Skip`] |
//! | `@` | [`Instruction::SkipIfZero`] |
//! | `Y` | [`Instruction::Fork`] |

use super::state::{Direction, Mode};

/// Data pointer motion performed by a data-advancing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataMove {
    /// `>`: column + 1, wrapping.
    Right,
    /// `<`: column − 1, wrapping.
    Left,
    /// `v`: row + 1, growing the grid.
    Down,
    /// `^`: row − 1, terminating the cursor at row 0.
    Up,
    /// `X`: no motion.
    Stay,
}

/// Mirror that changes the instruction pointer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirror {
    /// `\`
    Backslash,
    /// `/`
    Slash,
    /// `|`
    Bar,
}

impl Mirror {
    /// Direction after bouncing off this mirror.
    #[inline]
    pub const fn apply(self, dir: Direction) -> Direction {
        match self {
            Mirror::Backslash => dir.reflect_backslash(),
            Mirror::Slash => dir.reflect_slash(),
            Mirror::Bar => dir.reverse(),
        }
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Schedule a data effect, then move the data pointer.
    Data(DataMove),
    /// Change the data mode.
    SetMode(Mode),
    /// Change the instruction pointer direction.
    Reflect(Mirror),
    /// Unconditional extra instruction pointer advance.
    Skip,
    /// Extra advance when the data cell is zero.
    SkipIfZero,
    /// Split the cursor in two.
    Fork,
    /// Pass-through cell.
    Nop,
}

impl Instruction {
    /// Decode a cell byte.
    #[inline]
    pub const fn decode(byte: u8) -> Self {
        match byte {
            b'>' => Instruction::Data(DataMove::Right),
            b'<' => Instruction::Data(DataMove::Left),
            b'v' => Instruction::Data(DataMove::Down),
            b'^' => Instruction::Data(DataMove::Up),
            b'X' => Instruction::Data(DataMove::Stay),
            b'~' => Instruction::SetMode(Mode::None),
            b'+' => Instruction::SetMode(Mode::Add),
            b'-' => Instruction::SetMode(Mode::Subtract),
            b'?' => Instruction::SetMode(Mode::Input),
            b'!' => Instruction::SetMode(Mode::Output),
            b'*' => Instruction::SetMode(Mode::Clear),
            b'\\' => Instruction::Reflect(Mirror::Backslash),
            b'/' => Instruction::Reflect(Mirror::Slash),
            b'|' => Instruction::Reflect(Mirror::Bar),
            b'#' => Instruction::Skip,
            b'@' => Instruction::SkipIfZero,
            b'Y' => Instruction::Fork,
            _ => Instruction::Nop,
        }
    }

    /// Whether this instruction schedules a data effect when executed.
    #[inline]
    pub const fn is_data_advancing(self) -> bool {
        matches!(self, Instruction::Data(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_alphabet() {
        assert_eq!(Instruction::decode(b'>'), Instruction::Data(DataMove::Right));
        assert_eq!(Instruction::decode(b'^'), Instruction::Data(DataMove::Up));
        assert_eq!(Instruction::decode(b'X'), Instruction::Data(DataMove::Stay));
        assert_eq!(Instruction::decode(b'?'), Instruction::SetMode(Mode::Input));
        assert_eq!(Instruction::decode(b'*'), Instruction::SetMode(Mode::Clear));
        assert_eq!(Instruction::decode(b'|'), Instruction::Reflect(Mirror::Bar));
        assert_eq!(Instruction::decode(b'@'), Instruction::SkipIfZero);
        assert_eq!(Instruction::decode(b'Y'), Instruction::Fork);
    }

    #[test]
    fn test_everything_else_is_nop() {
        let alphabet = b"><v^X~+-?!*\\/|#@Y";
        let nops = (0..=255u8).filter(|b| !alphabet.contains(b)).count();
        assert_eq!(nops, 256 - alphabet.len());
        for byte in (0..=255u8).filter(|b| !alphabet.contains(b)) {
            assert_eq!(Instruction::decode(byte), Instruction::Nop, "byte {:#04x}", byte);
        }
        // Case matters: only `X`, `Y` and `v` are letters in the alphabet.
        assert_eq!(Instruction::decode(b'x'), Instruction::Nop);
        assert_eq!(Instruction::decode(b'V'), Instruction::Nop);
    }

    #[test]
    fn test_data_advancing() {
        for &byte in b"><v^X" {
            assert!(Instruction::decode(byte).is_data_advancing());
        }
        for &byte in b"~+-?!*\\/|#@Y " {
            assert!(!Instruction::decode(byte).is_data_advancing());
        }
    }

    #[test]
    fn test_mirror_apply() {
        assert_eq!(Mirror::Backslash.apply(Direction::Right), Direction::Down);
        assert_eq!(Mirror::Slash.apply(Direction::Right), Direction::Up);
        assert_eq!(Mirror::Bar.apply(Direction::Right), Direction::Left);
    }
}
