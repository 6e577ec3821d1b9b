//! Distance labels in metric or imperial units
//!
//! Metric picks m / cm / mm by magnitude. Imperial shows feet and inches
//! with the fraction rounded to the nearest sixteenth of an inch, the way a
//! tape measure reads.

use std::fmt;

/// Inches per metre
const INCHES_PER_METRE: f64 = 39.3701;
const SIXTEENTHS_PER_FOOT: u64 = 12 * 16;

/// Display units for every ruler label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_metric(use_metric: bool) -> Self {
        if use_metric {
            Self::Metric
        } else {
            Self::Imperial
        }
    }

    pub fn is_metric(self) -> bool {
        self == Self::Metric
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

/// Format a real-world distance given in metres
pub fn format_distance(metres: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format_metric(metres),
        UnitSystem::Imperial => format_imperial(metres * INCHES_PER_METRE),
    }
}

fn format_metric(metres: f64) -> String {
    if metres >= 1.0 {
        format!("{:.2} m", metres)
    } else if metres >= 0.01 {
        format!("{:.1} cm", metres * 100.0)
    } else {
        format!("{:.1} mm", metres * 1000.0)
    }
}

/// Feet-and-inches label for a length in inches.
///
/// Rounding happens once, on the whole length, so a remainder that rounds
/// up to 12" carries into the next foot.
pub(crate) fn format_imperial(total_inches: f64) -> String {
    let sixteenths = to_sixteenths(total_inches);
    let feet = sixteenths / SIXTEENTHS_PER_FOOT;
    let rest = sixteenths % SIXTEENTHS_PER_FOOT;

    match (feet, rest) {
        (0, _) => format!("{}\"", sixteenths_to_fraction(rest)),
        (_, 0) => format!("{}'", feet),
        _ => format!("{}' {}\"", feet, sixteenths_to_fraction(rest)),
    }
}

fn to_sixteenths(inches: f64) -> u64 {
    (inches.max(0.0) * 16.0).round() as u64
}

/// Whole inches plus a reduced fraction, e.g. `3 5/8`
fn sixteenths_to_fraction(sixteenths: u64) -> String {
    let whole = sixteenths / 16;
    let (mut num, mut den) = (sixteenths % 16, 16u64);
    if num == 0 {
        return whole.to_string();
    }

    while num % 2 == 0 {
        num /= 2;
        den /= 2;
    }

    if whole > 0 {
        format!("{} {}/{}", whole, num, den)
    } else {
        format!("{}/{}", num, den)
    }
}
