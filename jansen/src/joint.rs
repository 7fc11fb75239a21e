use crate::LinkId;
use std::fmt;

/// Name of a joint.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum JointName {
    /// Crank pivot (origin)
    A,
    /// Fixed pivot
    B,
    /// Crank tip
    C,
    /// Joint of the couplers
    D,
    /// Joint of the rockers
    E,
    /// Foot
    F,
}

impl JointName {
    /// All names in order.
    pub const ALL: [Self; 6] = [Self::A, Self::B, Self::C, Self::D, Self::E, Self::F];

    /// Return true if the joint is fixed on the ground.
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::A | Self::B)
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The bars of the mechanism, as pairs of joints with the length that
/// constrains them.
pub const LINKS: [(JointName, JointName, LinkId); 7] = {
    use JointName::*;
    [
        (A, C, LinkId::Crank),
        (C, D, LinkId::Coupler1),
        (D, B, LinkId::Coupler2),
        (B, E, LinkId::Rocker1),
        (D, E, LinkId::Coupler3),
        (E, F, LinkId::Rocker2),
        (D, F, LinkId::Ternary1),
    ]
};

/// Joint positions of the linkage at one crank angle.
///
/// The fixed pivots and the crank tip are always known. The solved joints
/// are `None` when the solver could not resolve them, and every joint
/// anchored on an unresolved one is unresolved as well.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointSnapshot {
    /// Crank pivot
    pub a: [f64; 2],
    /// Fixed pivot
    pub b: [f64; 2],
    /// Crank tip
    pub c: [f64; 2],
    /// Joint of the couplers
    pub d: Option<[f64; 2]>,
    /// Joint of the rockers
    pub e: Option<[f64; 2]>,
    /// Foot
    pub f: Option<[f64; 2]>,
}

impl JointSnapshot {
    /// Get a joint position.
    pub const fn get(&self, name: JointName) -> Option<[f64; 2]> {
        match name {
            JointName::A => Some(self.a),
            JointName::B => Some(self.b),
            JointName::C => Some(self.c),
            JointName::D => self.d,
            JointName::E => self.e,
            JointName::F => self.f,
        }
    }

    /// The foot position.
    pub const fn foot(&self) -> Option<[f64; 2]> {
        self.f
    }

    /// Return true if every joint is resolved.
    pub const fn is_complete(&self) -> bool {
        self.d.is_some() && self.e.is_some() && self.f.is_some()
    }

    /// Iterate over all six joints in order.
    pub fn iter(&self) -> impl Iterator<Item = (JointName, Option<[f64; 2]>)> + '_ {
        JointName::ALL.into_iter().map(|name| (name, self.get(name)))
    }

    /// The drawable bars: both ends of each bar are resolved.
    pub fn bars(&self) -> impl Iterator<Item = (LinkId, [[f64; 2]; 2])> + '_ {
        LINKS
            .into_iter()
            .filter_map(|(p, q, id)| Some((id, [self.get(p)?, self.get(q)?])))
    }
}
