//! Ingress Protection ratings and installation environments.
use std::fmt;

/// An IP code as (solid-ingress digit, liquid-ingress digit).
///
/// Ratings are only partially ordered: one rating meets another when both of
/// its digits are at least as high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRating {
    pub solid: u8,
    pub liquid: u8,
}

impl IpRating {
    pub const fn new(solid: u8, liquid: u8) -> Self {
        Self { solid, liquid }
    }

    /// Parses `IP` followed by two digits. An `X` digit means "not tested"
    /// and counts as zero.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.get(..2).filter(|p| p.eq_ignore_ascii_case("IP")).map(|_| &s[2..])?;
        let mut chars = digits.chars();
        let solid = Self::digit(chars.next()?)?;
        let liquid = Self::digit(chars.next()?)?;
        if chars.next().is_some() || solid > 6 || liquid > 9 {
            return None;
        }
        Some(Self { solid, liquid })
    }

    fn digit(c: char) -> Option<u8> {
        match c {
            'X' | 'x' => Some(0),
            _ => c.to_digit(10).map(|d| d as u8),
        }
    }

    pub fn meets(&self, required: &IpRating) -> bool {
        self.solid >= required.solid && self.liquid >= required.liquid
    }
}

impl fmt::Display for IpRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IP{}{}", self.solid, self.liquid)
    }
}

/// Where a connector is installed in the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Cabin,
    Trunk,
    Door,
    Exterior,
    EngineBay,
    Underbody,
    WheelWell,
}

impl Environment {
    /// Case-insensitive; `-` and spaces are read as `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        match key.as_str() {
            "CABIN" => Some(Self::Cabin),
            "TRUNK" => Some(Self::Trunk),
            "DOOR" => Some(Self::Door),
            "EXTERIOR" => Some(Self::Exterior),
            "ENGINE_BAY" => Some(Self::EngineBay),
            "UNDERBODY" => Some(Self::Underbody),
            "WHEEL_WELL" => Some(Self::WheelWell),
            _ => None,
        }
    }

    /// The weakest acceptable rating, `None` when the location imposes none.
    pub fn min_ip_rating(&self) -> Option<IpRating> {
        match self {
            Self::Cabin => None,
            Self::Trunk | Self::Door => Some(IpRating::new(5, 4)),
            Self::Exterior => Some(IpRating::new(6, 5)),
            Self::EngineBay | Self::Underbody => Some(IpRating::new(6, 7)),
            Self::WheelWell => Some(IpRating::new(6, 9)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cabin => "CABIN",
            Self::Trunk => "TRUNK",
            Self::Door => "DOOR",
            Self::Exterior => "EXTERIOR",
            Self::EngineBay => "ENGINE_BAY",
            Self::Underbody => "UNDERBODY",
            Self::WheelWell => "WHEEL_WELL",
        }
    }
}
