use rand::Rng;

/// A grammar symbol and the turtle action it stands for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Symbol {
    /// `F`: move one step along the heading and record the new position.
    Forward,
    /// `+`: yaw about world up.
    YawClockwise,
    /// `-`: yaw about world down.
    YawCounterClockwise,
    /// `U`: pitch about world right.
    PitchUp,
    /// `D`: pitch about world left.
    PitchDown,
    /// `S`
    SavePosition,
    /// `L`: return to the saved position and start a new branch there.
    LoadPosition,
    /// `>`
    StepIncrease,
    /// `<`
    StepDecrease,
    /// `O`
    AngleIncrease,
    /// `A`
    AngleDecrease,
}

/// The symbols drawn when rules and axioms are generated pseudorandomly. The angle symbols are only reachable through
/// supplied strings.
pub const MOTION_SYMBOLS: [Symbol; 9] = [
    Symbol::Forward,
    Symbol::YawClockwise,
    Symbol::YawCounterClockwise,
    Symbol::SavePosition,
    Symbol::LoadPosition,
    Symbol::PitchUp,
    Symbol::PitchDown,
    Symbol::StepIncrease,
    Symbol::StepDecrease,
];

impl Symbol {
    pub const fn to_char(self) -> char {
        match self {
            Self::Forward => 'F',
            Self::YawClockwise => '+',
            Self::YawCounterClockwise => '-',
            Self::PitchUp => 'U',
            Self::PitchDown => 'D',
            Self::SavePosition => 'S',
            Self::LoadPosition => 'L',
            Self::StepIncrease => '>',
            Self::StepDecrease => '<',
            Self::AngleIncrease => 'O',
            Self::AngleDecrease => 'A',
        }
    }

    /// Characters outside of the alphabet have no action.
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'F' => Self::Forward,
            '+' => Self::YawClockwise,
            '-' => Self::YawCounterClockwise,
            'U' => Self::PitchUp,
            'D' => Self::PitchDown,
            'S' => Self::SavePosition,
            'L' => Self::LoadPosition,
            '>' => Self::StepIncrease,
            '<' => Self::StepDecrease,
            'O' => Self::AngleIncrease,
            'A' => Self::AngleDecrease,
            _ => return None,
        })
    }

    /// Draws uniformly from [`MOTION_SYMBOLS`].
    pub fn random_motion(rng: &mut impl Rng) -> Self {
        MOTION_SYMBOLS[rng.gen_range(0..MOTION_SYMBOLS.len())]
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
