use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 16 compass points used as wind-direction labels in the source
/// data. Labels outside this set stay unmapped and are excluded from wind
/// aggregates; they are never coerced to 0 degrees, which is itself a valid
/// direction (North).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// All 16 points in clockwise order starting at North.
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "N" => Some(CompassPoint::N),
            "NNE" => Some(CompassPoint::NNE),
            "NE" => Some(CompassPoint::NE),
            "ENE" => Some(CompassPoint::ENE),
            "E" => Some(CompassPoint::E),
            "ESE" => Some(CompassPoint::ESE),
            "SE" => Some(CompassPoint::SE),
            "SSE" => Some(CompassPoint::SSE),
            "S" => Some(CompassPoint::S),
            "SSW" => Some(CompassPoint::SSW),
            "SW" => Some(CompassPoint::SW),
            "WSW" => Some(CompassPoint::WSW),
            "W" => Some(CompassPoint::W),
            "WNW" => Some(CompassPoint::WNW),
            "NW" => Some(CompassPoint::NW),
            "NNW" => Some(CompassPoint::NNW),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }

    /// Degrees clockwise from North, in [0, 360).
    pub fn degrees(&self) -> f64 {
        match self {
            CompassPoint::N => 0.0,
            CompassPoint::NNE => 22.5,
            CompassPoint::NE => 45.0,
            CompassPoint::ENE => 67.5,
            CompassPoint::E => 90.0,
            CompassPoint::ESE => 112.5,
            CompassPoint::SE => 135.0,
            CompassPoint::SSE => 157.5,
            CompassPoint::S => 180.0,
            CompassPoint::SSW => 202.5,
            CompassPoint::SW => 225.0,
            CompassPoint::WSW => 247.5,
            CompassPoint::W => 270.0,
            CompassPoint::WNW => 292.5,
            CompassPoint::NW => 315.0,
            CompassPoint::NNW => 337.5,
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_degrees() {
        assert_eq!(CompassPoint::N.degrees(), 0.0);
        assert_eq!(CompassPoint::E.degrees(), 90.0);
        assert_eq!(CompassPoint::S.degrees(), 180.0);
        assert_eq!(CompassPoint::W.degrees(), 270.0);
    }

    #[test]
    fn test_mapping_is_total_on_valid_labels() {
        for point in CompassPoint::ALL {
            assert_eq!(CompassPoint::from_label(point.label()), Some(point));
            let degrees = point.degrees();
            assert!((0.0..360.0).contains(&degrees));
        }
    }

    #[test]
    fn test_points_are_evenly_spaced() {
        for (i, point) in CompassPoint::ALL.iter().enumerate() {
            assert_eq!(point.degrees(), i as f64 * 22.5);
        }
    }

    #[test]
    fn test_unknown_labels_are_unmapped() {
        assert_eq!(CompassPoint::from_label("NNNE"), None);
        assert_eq!(CompassPoint::from_label("n"), None);
        assert_eq!(CompassPoint::from_label(""), None);
        assert_eq!(CompassPoint::from_label("360"), None);
    }
}
