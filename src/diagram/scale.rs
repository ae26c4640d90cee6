//! Scales mapping data values onto positions and colours.

use super::scene::Color;

/// Continuous linear mapping from a domain onto a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Map `domain` onto `range`.
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scaled value. A zero-width domain maps to the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Position of `v` within the domain, clamped to 0..=1.
    pub fn normalize(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        if (d1 - d0).abs() < f64::EPSILON {
            return 0.5;
        }
        ((v - d0) / (d1 - d0)).clamp(0.0, 1.0)
    }
}

/// Nine-class sequential ramps, light to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    /// Light to dark blue.
    Blues,
    /// Light to dark orange.
    Oranges,
}

const BLUES: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c", "#08306b",
];
const ORANGES: [&str; 9] = [
    "#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801", "#a63603", "#7f2704",
];

impl Ramp {
    /// Colour at `t` in 0..=1, piecewise linear between the nine stops.
    pub fn at(self, t: f64) -> Color {
        let stops = match self {
            Self::Blues => &BLUES,
            Self::Oranges => &ORANGES,
        };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let lo = Color::from_hex(stops[i]).unwrap_or(Color::WHITE);
        let hi = Color::from_hex(stops[i + 1]).unwrap_or(Color::BLACK);
        lo.lerp(hi, pos - i as f64)
    }
}

/// Domain value to ramp colour. Reversing the domain reverses the ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    scale: LinearScale,
    ramp: Ramp,
}

impl SequentialScale {
    /// `domain.0` maps to the light end, `domain.1` to the dark end.
    pub const fn new(domain: (f64, f64), ramp: Ramp) -> Self {
        Self { scale: LinearScale::new(domain, (0.0, 1.0)), ramp }
    }

    /// Colour for a value, clamped into the domain.
    pub fn apply(&self, v: f64) -> Color {
        self.ramp.at(self.scale.normalize(v))
    }
}

/// Band positions for discrete labels, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    start: f64,
    step: f64,
}

impl BandScale {
    /// One band of width `step` per distinct label, starting at `start`.
    pub fn new<I, S>(labels: I, start: f64, step: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        Self { labels: seen, start, step }
    }

    /// Left edge of a label's band.
    pub fn position(&self, label: &str) -> Option<f64> {
        self.labels.iter().position(|l| l == label).map(|i| self.start + i as f64 * self.step)
    }

    /// Band width.
    pub const fn bandwidth(&self) -> f64 {
        self.step
    }

    /// Labels in band order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
