use super::Symbol;
use crate::glam::{Quat, Vec3};

/// Multiplier applied by each [`Symbol::StepIncrease`]; [`Symbol::StepDecrease`] uses `2 - STEP_FACTOR`.
pub const STEP_FACTOR: f32 = 1.05;
/// Degrees added or removed by each angle symbol.
pub const ANGLE_DELTA_DEG: f32 = 10.0;
/// The step length stays within `[MIN_STEP_SCALE, MAX_STEP_SCALE] * base_step`.
pub const MIN_STEP_SCALE: f32 = 0.5;
pub const MAX_STEP_SCALE: f32 = 2.0;

/// The virtual pen that walks the expanded word. Each symbol maps to a pure transition `Turtle -> (Turtle, Mark)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turtle {
    pub position: Vec3,
    pub orientation: Quat,
    pub step: f32,
    pub angle_deg: f32,
    pub saved_position: Vec3,
    base_step: f32,
}

/// What the skeleton builder should do after a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mark {
    None,
    /// Append this point to the current branch.
    Record(Vec3),
    /// Start a new branch whose first point is this one.
    Branch(Vec3),
}

impl Turtle {
    /// Starts at `position` facing +Z, with the save slot holding `position`.
    pub fn new(position: Vec3, base_step: f32, base_angle_deg: f32) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            step: base_step,
            angle_deg: base_angle_deg,
            saved_position: position,
            base_step,
        }
    }

    pub fn heading(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    pub fn base_step(&self) -> f32 {
        self.base_step
    }

    pub fn apply(&self, symbol: Symbol) -> (Self, Mark) {
        let mut next = *self;
        let mark = match symbol {
            Symbol::Forward => {
                next.position += self.heading() * self.step;
                Mark::Record(next.position)
            }
            Symbol::YawClockwise => {
                next.orientation = self.rotated(Vec3::Y);
                Mark::None
            }
            Symbol::YawCounterClockwise => {
                next.orientation = self.rotated(Vec3::NEG_Y);
                Mark::None
            }
            Symbol::PitchUp => {
                next.orientation = self.rotated(Vec3::X);
                Mark::None
            }
            Symbol::PitchDown => {
                next.orientation = self.rotated(Vec3::NEG_X);
                Mark::None
            }
            Symbol::SavePosition => {
                next.saved_position = self.position;
                Mark::None
            }
            Symbol::LoadPosition => {
                next.position = self.saved_position;
                Mark::Branch(next.position)
            }
            Symbol::StepIncrease => {
                next.step = (self.step * STEP_FACTOR).min(MAX_STEP_SCALE * self.base_step);
                Mark::None
            }
            Symbol::StepDecrease => {
                next.step = (self.step * (2.0 - STEP_FACTOR)).max(MIN_STEP_SCALE * self.base_step);
                Mark::None
            }
            Symbol::AngleIncrease => {
                next.angle_deg += ANGLE_DELTA_DEG;
                Mark::None
            }
            Symbol::AngleDecrease => {
                next.angle_deg -= ANGLE_DELTA_DEG;
                Mark::None
            }
        };
        (next, mark)
    }

    /// World-space rotation about `axis` by the current turn angle.
    fn rotated(&self, axis: Vec3) -> Quat {
        (Quat::from_axis_angle(axis, self.angle_deg.to_radians()) * self.orientation).normalize()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
