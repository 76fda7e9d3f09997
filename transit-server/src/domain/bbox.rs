//! Geographic bounding boxes.
//!
//! Clients supply a box either as four explicit corner parameters or as a
//! single comma-separated `west,south,east,north` string. Extents are not
//! validated against each other: a box with swapped corners is passed through
//! and simply matches nothing downstream.

use std::fmt;

/// Rectangular geographic filter in WGS84 longitude/latitude degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// Error parsing a `west,south,east,north` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BboxParseError {
    /// The string did not contain exactly four comma-separated parts.
    #[error("expected 4 comma-separated coordinates, got {0}")]
    WrongArity(usize),

    /// One of the parts was not a valid floating-point number.
    #[error("invalid coordinate: {0:?}")]
    BadCoordinate(String),
}

impl BoundingBox {
    /// Create a bounding box from its four extents.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Parse a `west,south,east,north` string.
    ///
    /// Whitespace around each coordinate is tolerated.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::BoundingBox;
    ///
    /// let bbox = BoundingBox::parse("13.38,52.51,13.43,52.53").unwrap();
    /// assert_eq!(bbox.west, 13.38);
    /// assert_eq!(bbox.north, 52.53);
    /// ```
    pub fn parse(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(BboxParseError::WrongArity(parts.len()));
        }

        let mut coords = [0.0_f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| BboxParseError::BadCoordinate(part.trim().to_string()))?;
        }

        Ok(Self::new(coords[0], coords[1], coords[2], coords[3]))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}
