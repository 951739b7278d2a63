//! Coordinate Reference System handling
//!
//! The clustering pipeline never reprojects; a `Crs` is an opaque
//! identifier carried from the input layer to the output layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// EPSG code if known
    epsg: Option<u32>,
    /// WKT representation if no EPSG code is available
    wkt: Option<String>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            epsg: None,
            wkt: Some(wkt.into()),
        }
    }

    /// Parse an authority identifier such as `EPSG:4326` or the legacy
    /// GeoJSON URN form `urn:ogc:def:crs:EPSG::4326`.
    ///
    /// Returns `None` if the string carries no recognizable EPSG code.
    pub fn from_authid(authid: &str) -> Option<Self> {
        let upper = authid.to_ascii_uppercase();
        if !upper.starts_with("EPSG:") && !upper.contains(":EPSG:") {
            return None;
        }
        let tail = authid.rsplit(':').next()?;
        let code: u32 = tail.trim().parse().ok()?;
        Some(Self::from_epsg(code))
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Check if two CRS are equivalent.
    ///
    /// EPSG codes compare numerically; WKT strings compare verbatim,
    /// which is imperfect but errs toward reporting a mismatch.
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }
        false
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", &wkt[..wkt.len().min(50)]);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}
