//! Easing and spline modifier names carried by keyframes.
//!
//! The renderer owns the curve math; this module only recognizes the
//! modifier tokens so they survive parsing and re-serialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Easing applied to the segment that ends at the keyframe carrying it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    Step,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

const EASE_NAMES: [(Ease, &str); 32] = [
    (Ease::Linear, "easeLinear"),
    (Ease::Step, "easeStep"),
    (Ease::InQuad, "easeInQuad"),
    (Ease::OutQuad, "easeOutQuad"),
    (Ease::InOutQuad, "easeInOutQuad"),
    (Ease::InCubic, "easeInCubic"),
    (Ease::OutCubic, "easeOutCubic"),
    (Ease::InOutCubic, "easeInOutCubic"),
    (Ease::InQuart, "easeInQuart"),
    (Ease::OutQuart, "easeOutQuart"),
    (Ease::InOutQuart, "easeInOutQuart"),
    (Ease::InQuint, "easeInQuint"),
    (Ease::OutQuint, "easeOutQuint"),
    (Ease::InOutQuint, "easeInOutQuint"),
    (Ease::InSine, "easeInSine"),
    (Ease::OutSine, "easeOutSine"),
    (Ease::InOutSine, "easeInOutSine"),
    (Ease::InExpo, "easeInExpo"),
    (Ease::OutExpo, "easeOutExpo"),
    (Ease::InOutExpo, "easeInOutExpo"),
    (Ease::InCirc, "easeInCirc"),
    (Ease::OutCirc, "easeOutCirc"),
    (Ease::InOutCirc, "easeInOutCirc"),
    (Ease::InBack, "easeInBack"),
    (Ease::OutBack, "easeOutBack"),
    (Ease::InOutBack, "easeInOutBack"),
    (Ease::InElastic, "easeInElastic"),
    (Ease::OutElastic, "easeOutElastic"),
    (Ease::InOutElastic, "easeInOutElastic"),
    (Ease::InBounce, "easeInBounce"),
    (Ease::OutBounce, "easeOutBounce"),
    (Ease::InOutBounce, "easeInOutBounce"),
];

impl Ease {
    /// Wire token for this easing (e.g. `"easeInOutQuad"`).
    pub fn name(self) -> &'static str {
        EASE_NAMES
            .iter()
            .find(|(e, _)| *e == self)
            .map(|(_, n)| *n)
            .unwrap_or("easeLinear")
    }

    /// Look up an easing by its wire token.
    pub fn from_name(name: &str) -> Option<Self> {
        EASE_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(e, _)| *e)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown easing '{s}'"))
    }
}

impl TryFrom<String> for Ease {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.name().to_string()
    }
}

/// Spline used for the segment that ends at the keyframe carrying it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spline {
    #[serde(rename = "splineCatmullRom")]
    CatmullRom,
}

impl Spline {
    pub fn name(self) -> &'static str {
        match self {
            Spline::CatmullRom => "splineCatmullRom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "splineCatmullRom" => Some(Spline::CatmullRom),
            _ => None,
        }
    }
}

impl fmt::Display for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
