//! EPSG code helpers: UTM zone selection and WKT authority extraction.

/// EPSG code for geographic WGS84 (lat/lon in degrees).
pub const EPSG_WGS84: u32 = 4326;

/// Determine the UTM zone EPSG code for a geographic coordinate.
///
/// Zone number is `floor((lon + 180) / 6) mod 60 + 1`; the northern
/// hemisphere series is 326xx, the southern 327xx. Out-of-range input
/// produces a nonsensical but non-panicking code; callers are expected to
/// supply a coordinate from within the scene extent.
pub fn utm_zone_epsg(lat: f64, lon: f64) -> u32 {
    let zone = (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u32 + 1;
    if lat >= 0.0 {
        32600 + zone
    } else {
        32700 + zone
    }
}

/// Zone number (1..=60) from a UTM EPSG code, if the code is UTM at all.
pub fn utm_zone_from_epsg(epsg: u32) -> Option<(u32, bool)> {
    match epsg {
        32601..=32660 => Some((epsg - 32600, false)),
        32701..=32760 => Some((epsg - 32700, true)),
        _ => None,
    }
}

/// Extract the outermost EPSG authority code from OGC Well-Known Text.
///
/// WKT nests `AUTHORITY["EPSG","nnnn"]` clauses; the last one names the
/// full CRS. Returns `None` when the text carries no parseable authority.
pub fn epsg_from_wkt(wkt: &str) -> Option<u32> {
    let mut found = None;
    let mut rest = wkt;
    while let Some(pos) = rest.find("AUTHORITY[") {
        let clause = &rest[pos + "AUTHORITY[".len()..];
        // Clause body looks like "EPSG","32613"]
        if let Some(end) = clause.find(']') {
            let body = &clause[..end];
            let code = body
                .split(',')
                .nth(1)
                .map(|s| s.trim().trim_matches('"'))
                .and_then(|s| s.parse::<u32>().ok());
            if code.is_some() {
                found = code;
            }
        }
        rest = &clause[..];
    }
    found
}
