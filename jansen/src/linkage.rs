use crate::{JointSnapshot, Trajectory};
use std::{fmt, str::FromStr};

/// Scale factor of the default linkage.
pub const DEFAULT_SCALE: f64 = 5.;

/// Error of the linkage configuration.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    /// A length or the scale factor is not a finite positive number.
    #[error("invalid parameter `{name}`: {value} is not a finite positive number")]
    InvalidParameter {
        /// Name of the parameter
        name: &'static str,
        /// The rejected value
        value: f64,
    },
}

/// Result type of the configuration operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error for link identifier parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown link identifier `{0}`")]
pub struct ParseLinkIdError(String);

fn check(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0. {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

/// Identifier of a configured length.
///
/// The first eight are bars, the last two locate the second fixed pivot.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum LinkId {
    /// Crank `a`
    Crank,
    /// Coupler 1 `b`
    Coupler1,
    /// Coupler 2 `c`
    Coupler2,
    /// Coupler 3 `d`
    Coupler3,
    /// Rocker 1 `e`
    Rocker1,
    /// Rocker 2 `f`
    Rocker2,
    /// Ternary 1 `g`
    Ternary1,
    /// Ternary 2 `h`
    Ternary2,
    /// Horizontal offset of the fixed pivot `m`
    OffsetX,
    /// Vertical offset of the fixed pivot `n`
    OffsetY,
}

impl LinkId {
    /// All identifiers in canonical order.
    pub const ALL: [Self; 10] = [
        Self::Crank,
        Self::Coupler1,
        Self::Coupler2,
        Self::Coupler3,
        Self::Rocker1,
        Self::Rocker2,
        Self::Ternary1,
        Self::Ternary2,
        Self::OffsetX,
        Self::OffsetY,
    ];

    /// Get the snake case name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Crank => "crank",
            Self::Coupler1 => "coupler1",
            Self::Coupler2 => "coupler2",
            Self::Coupler3 => "coupler3",
            Self::Rocker1 => "rocker1",
            Self::Rocker2 => "rocker2",
            Self::Ternary1 => "ternary1",
            Self::Ternary2 => "ternary2",
            Self::OffsetX => "offset_x",
            Self::OffsetY => "offset_y",
        }
    }

    /// Get the single letter name used on drawings of the mechanism.
    pub const fn letter(&self) -> char {
        match self {
            Self::Crank => 'a',
            Self::Coupler1 => 'b',
            Self::Coupler2 => 'c',
            Self::Coupler3 => 'd',
            Self::Rocker1 => 'e',
            Self::Rocker2 => 'f',
            Self::Ternary1 => 'g',
            Self::Ternary2 => 'h',
            Self::OffsetX => 'm',
            Self::OffsetY => 'n',
        }
    }

    /// Return true if the identifier is a bar rather than a pivot offset.
    pub const fn is_bar(&self) -> bool {
        !matches!(self, Self::OffsetX | Self::OffsetY)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LinkId {
    type Err = ParseLinkIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|id| id.name() == key || (key.len() == 1 && key.starts_with(id.letter())))
            .ok_or_else(|| ParseLinkIdError(s.to_string()))
    }
}

/// Lengths of the linkage in millimeters.
///
/// This is plain data without validation, a [`Linkage`] keeps it valid.
/// Missing fields are filled with the canonical proportions when
/// deserializing.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lengths {
    /// Crank `a`
    pub crank: f64,
    /// Coupler 1 `b`
    pub coupler1: f64,
    /// Coupler 2 `c`
    pub coupler2: f64,
    /// Coupler 3 `d`
    pub coupler3: f64,
    /// Rocker 1 `e`
    pub rocker1: f64,
    /// Rocker 2 `f`
    pub rocker2: f64,
    /// Ternary 1 `g`
    pub ternary1: f64,
    /// Ternary 2 `h`
    pub ternary2: f64,
    /// Horizontal offset of the fixed pivot `m`
    pub offset_x: f64,
    /// Vertical offset of the fixed pivot `n`
    pub offset_y: f64,
}

impl Default for Lengths {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl Lengths {
    /// Theo Jansen's proportions.
    pub const CANONICAL: Self = Self {
        crank: 38.,
        coupler1: 41.5,
        coupler2: 39.3,
        coupler3: 40.1,
        rocker1: 55.8,
        rocker2: 39.4,
        ternary1: 36.7,
        ternary2: 65.7,
        offset_x: 7.8,
        offset_y: 25.,
    };

    /// Get a length by its identifier.
    pub const fn get(&self, id: LinkId) -> f64 {
        match id {
            LinkId::Crank => self.crank,
            LinkId::Coupler1 => self.coupler1,
            LinkId::Coupler2 => self.coupler2,
            LinkId::Coupler3 => self.coupler3,
            LinkId::Rocker1 => self.rocker1,
            LinkId::Rocker2 => self.rocker2,
            LinkId::Ternary1 => self.ternary1,
            LinkId::Ternary2 => self.ternary2,
            LinkId::OffsetX => self.offset_x,
            LinkId::OffsetY => self.offset_y,
        }
    }

    /// Set a length by its identifier. The value is not checked.
    pub fn set(&mut self, id: LinkId, value: f64) {
        let field = match id {
            LinkId::Crank => &mut self.crank,
            LinkId::Coupler1 => &mut self.coupler1,
            LinkId::Coupler2 => &mut self.coupler2,
            LinkId::Coupler3 => &mut self.coupler3,
            LinkId::Rocker1 => &mut self.rocker1,
            LinkId::Rocker2 => &mut self.rocker2,
            LinkId::Ternary1 => &mut self.ternary1,
            LinkId::Ternary2 => &mut self.ternary2,
            LinkId::OffsetX => &mut self.offset_x,
            LinkId::OffsetY => &mut self.offset_y,
        };
        *field = value;
    }

    /// Iterate over all identifiers and lengths.
    pub fn iter(&self) -> impl Iterator<Item = (LinkId, f64)> + '_ {
        LinkId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Multiply every length by a factor.
    pub fn scaled(mut self, scale: f64) -> Self {
        LinkId::ALL
            .into_iter()
            .for_each(|id| self.set(id, self.get(id) * scale));
        self
    }

    /// Check that every length is a finite positive number.
    pub fn validate(&self) -> Result<()> {
        self.iter().try_for_each(|(id, v)| check(id.name(), v).map(|_| ()))
    }
}

/// Configuration of the leg linkage: raw lengths and a uniform scale
/// factor.
///
/// The scaled lengths are recomputed on every change, and the setters leave
/// the configuration untouched when they reject a value.
///
/// ```
/// use jansen::{Error, LinkId, Linkage};
///
/// let mut linkage = Linkage::canonical();
/// linkage.set_length(LinkId::Crank, 40.).unwrap();
/// assert_eq!(linkage.scaled_lengths().crank, 40.);
/// assert!(matches!(linkage.set_scale(-1.), Err(Error::InvalidParameter { .. })));
/// assert_eq!(linkage.scale(), 1.);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "LinkageCfg", into = "LinkageCfg")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Linkage {
    raw: Lengths,
    scale: f64,
    scaled: Lengths,
}

impl Default for Linkage {
    fn default() -> Self {
        let raw = Lengths::CANONICAL;
        Self { raw, scale: DEFAULT_SCALE, scaled: raw.scaled(DEFAULT_SCALE) }
    }
}

impl Linkage {
    /// Create a new instance from raw lengths and a scale factor.
    ///
    /// The scaled lengths must stay finite and positive as well.
    pub fn new(raw: Lengths, scale: f64) -> Result<Self> {
        raw.validate()?;
        let scale = check("scale", scale)?;
        let scaled = raw.scaled(scale);
        scaled.validate()?;
        Ok(Self { raw, scale, scaled })
    }

    /// The canonical proportions without scaling.
    pub const fn canonical() -> Self {
        let raw = Lengths::CANONICAL;
        Self { raw, scale: 1., scaled: raw }
    }

    /// Replace a raw length.
    pub fn set_length(&mut self, id: LinkId, value: f64) -> Result<()> {
        let mut raw = self.raw;
        raw.set(id, check(id.name(), value)?);
        *self = Self::new(raw, self.scale)?;
        tracing::debug!(%id, value, "length changed");
        Ok(())
    }

    /// Replace the scale factor.
    pub fn set_scale(&mut self, value: f64) -> Result<()> {
        *self = Self::new(self.raw, check("scale", value)?)?;
        tracing::debug!(scale = value, "scale changed");
        Ok(())
    }

    /// Restore the eight bars to the canonical proportions.
    ///
    /// The pivot offsets and the scale factor are kept. Fail without change
    /// if a restored bar overflows at the current scale.
    pub fn restore_canonical_links(&mut self) -> Result<()> {
        let mut raw = self.raw;
        LinkId::ALL
            .into_iter()
            .filter(LinkId::is_bar)
            .for_each(|id| raw.set(id, Lengths::CANONICAL.get(id)));
        *self = Self::new(raw, self.scale)?;
        Ok(())
    }

    /// A copy of the scaled lengths.
    ///
    /// Take this snapshot before a sweep so the sweep never observes a
    /// partial update.
    pub fn scaled_lengths(&self) -> Lengths {
        self.scaled
    }

    /// The raw lengths.
    pub fn raw_lengths(&self) -> &Lengths {
        &self.raw
    }

    /// Get a raw length.
    pub fn length(&self, id: LinkId) -> f64 {
        self.raw.get(id)
    }

    /// The scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Solve all joint positions at the crank angle (radians).
    pub fn solve(&self, theta: f64) -> JointSnapshot {
        crate::solve(&self.scaled, theta)
    }

    /// Sample the foot trajectory over one crank revolution.
    pub fn sample_trajectory(&self, count: usize) -> Trajectory {
        Trajectory::sample(&self.scaled, count)
    }
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Deserialize, serde::Serialize)]
struct LinkageCfg {
    #[serde(default)]
    lengths: Lengths,
    #[serde(default = "default_scale")]
    scale: f64,
}

#[cfg(feature = "serde")]
fn default_scale() -> f64 {
    DEFAULT_SCALE
}

#[cfg(feature = "serde")]
impl TryFrom<LinkageCfg> for Linkage {
    type Error = Error;

    fn try_from(cfg: LinkageCfg) -> Result<Self> {
        Self::new(cfg.lengths, cfg.scale)
    }
}

#[cfg(feature = "serde")]
impl From<Linkage> for LinkageCfg {
    fn from(linkage: Linkage) -> Self {
        Self { lengths: linkage.raw, scale: linkage.scale }
    }
}
