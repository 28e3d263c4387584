//! Degrees-minutes coordinates such as "34 00 N, 65 00 E".

/// Converts one degrees-minutes-hemisphere token triple to signed decimal
/// degrees: `sign * (deg + min / 60)`, negative for S and W.
///
/// Returns `None` unless the input has exactly three tokens with numeric
/// degree and minute parts.
pub fn parse_one_coord(raw: &str) -> Option<f64> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [deg, min, hemisphere] = tokens.as_slice() else {
        return None;
    };
    let deg = deg.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let min = min.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let sign = if hemisphere.eq_ignore_ascii_case("S") || hemisphere.eq_ignore_ascii_case("W") {
        -1.0
    } else {
        1.0
    };
    Some(sign * (deg + min / 60.0))
}

/// Parses a `"<lat>, <lon>"` pair; each half is independently `None` when
/// malformed. Input without exactly one comma yields `(None, None)`.
pub fn parse_coordinates(raw: &str) -> (Option<f64>, Option<f64>) {
    let parts: Vec<&str> = raw.split(',').collect();
    match parts.as_slice() {
        [lat, lon] => (parse_one_coord(lat), parse_one_coord(lon)),
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_coord() {
        assert_eq!(parse_one_coord("34 00 N"), Some(34.0));
        assert_eq!(parse_one_coord("62 30 S"), Some(-62.5));
        assert_eq!(parse_one_coord("77 02 W"), Some(-(77.0 + 2.0 / 60.0)));
        assert_eq!(parse_one_coord(" 10 30 e "), Some(10.5));
    }

    #[test]
    fn test_malformed_coord() {
        assert_eq!(parse_one_coord("34 N"), None);
        assert_eq!(parse_one_coord("34 00 00 N"), None);
        assert_eq!(parse_one_coord("xx 00 N"), None);
        assert_eq!(parse_one_coord("34 yy N"), None);
        assert_eq!(parse_one_coord(""), None);
    }

    #[test]
    fn test_pair() {
        assert_eq!(parse_coordinates("33 00 N, 65 00 E"), (Some(33.0), Some(65.0)));
        assert_eq!(parse_coordinates("15 00 S, 47 30 W"), (Some(-15.0), Some(-47.5)));
        assert_eq!(parse_coordinates("33 00 N, bad"), (Some(33.0), None));
        assert_eq!(parse_coordinates("33 00 N"), (None, None));
    }
}
