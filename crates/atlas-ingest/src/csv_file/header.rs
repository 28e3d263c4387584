//! Header cleanup.

use std::collections::BTreeSet;

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans raw header cells: trims whitespace and BOM, names blank headers
/// `Unnamed: <idx>`, and suffixes repeated names with `.1`, `.2`, ...
pub fn normalize_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut headers = Vec::new();
    for (idx, value) in raw.into_iter().enumerate() {
        let mut name = normalize_header(value);
        if name.is_empty() {
            name = format!("Unnamed: {idx}");
        }
        if seen.contains(&name) {
            let mut counter = 1usize;
            while seen.contains(&format!("{name}.{counter}")) {
                counter += 1;
            }
            let renamed = format!("{name}.{counter}");
            tracing::warn!(header = %name, renamed = %renamed, "Duplicate CSV header renamed");
            name = renamed;
        }
        seen.insert(name.clone());
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_and_whitespace() {
        let headers = normalize_headers(["\u{feff}Country", "  Total  Area "]);
        assert_eq!(headers, vec!["Country", "Total Area"]);
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let headers = normalize_headers(["Country", "", "GDP", "GDP", "GDP"]);
        assert_eq!(
            headers,
            vec!["Country", "Unnamed: 1", "GDP", "GDP.1", "GDP.2"]
        );
    }
}
