use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use sgp4::{Constants, Elements};

use crate::propagate::error::PropagateError;
use crate::propagate::types::SatelliteInfo;

const MINUTES_PER_DAY: f64 = 1440.0;

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

impl TleEntry {
    /// Orbital period in minutes, from the mean motion in revolutions per day
    pub fn period_minutes(&self) -> f64 {
        MINUTES_PER_DAY / self.elements.mean_motion
    }
}

/// TLE sets indexed by satellite name (case-insensitive)
#[derive(Default)]
pub struct TleCatalog {
    satellites: HashMap<String, TleEntry>,
}

impl TleCatalog {
    /// Load all TLE files from the directory
    pub fn load_dir(tle_dir: &Path) -> Result<Self, PropagateError> {
        if !tle_dir.exists() {
            return Err(PropagateError::DirectoryNotFound(
                tle_dir.display().to_string(),
            ));
        }

        let mut catalog = Self::default();

        let mut paths: Vec<PathBuf> = fs::read_dir(tle_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        paths.sort();

        for path in paths {
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if ext != "tle" && ext != "txt" {
                continue;
            }

            match parse_tle_file(&path) {
                Ok(entries) => {
                    for tle_entry in entries {
                        catalog.insert(tle_entry);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                }
            }
        }

        log::info!(
            "Loaded {} satellites from {}",
            catalog.len(),
            tle_dir.display()
        );
        Ok(catalog)
    }

    /// Parse TLE text that may hold several satellites
    pub fn from_tle_str(content: &str, source: &str) -> Result<Self, PropagateError> {
        let mut catalog = Self::default();
        for tle_entry in parse_tle_content(content, source)? {
            catalog.insert(tle_entry);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, entry: TleEntry) {
        let key = catalog_key(&entry.info.name);
        if self.satellites.contains_key(&key) {
            log::debug!("Replacing TLE for {} from {}", entry.info.name, entry.info.tle_source);
        }
        self.satellites.insert(key, entry);
    }

    pub fn get(&self, name: &str) -> Result<&TleEntry, PropagateError> {
        self.satellites
            .get(&catalog_key(name))
            .ok_or_else(|| PropagateError::SatelliteNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}

fn catalog_key(name: &str) -> String {
    name.trim().to_uppercase()
}

fn parse_tle_file(path: &Path) -> Result<Vec<TleEntry>, PropagateError> {
    let content = fs::read_to_string(path)?;
    let filename = path.file_name().unwrap_or_default().to_string_lossy().to_string();
    parse_tle_content(&content, &filename)
}

fn parse_tle_content(content: &str, source: &str) -> Result<Vec<TleEntry>, PropagateError> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut rest = lines.as_slice();

    // sets are either `line1 line2` or `title line1 line2`; anything else is skipped
    while !rest.is_empty() {
        let (title, line1, line2, consumed) = match rest {
            [l1, l2, ..] if is_element_line(l1, '1') && is_element_line(l2, '2') => {
                (None, *l1, *l2, 2)
            }
            [title, l1, l2, ..] if is_element_line(l1, '1') && is_element_line(l2, '2') => {
                (Some(object_name(title)), *l1, *l2, 3)
            }
            _ => {
                rest = &rest[1..];
                continue;
            }
        };
        entries.push(build_entry(title, line1, line2, source)?);
        rest = &rest[consumed..];
    }

    Ok(entries)
}

fn is_element_line(line: &str, number: char) -> bool {
    line.strip_prefix(number)
        .is_some_and(|tail| tail.starts_with(' '))
}

/// Celestrak 3LE files prefix the title line with `0 `
fn object_name(title: &str) -> String {
    title.strip_prefix("0 ").unwrap_or(title).trim().to_string()
}

fn build_entry(
    title: Option<String>,
    line1: &str,
    line2: &str,
    source: &str,
) -> Result<TleEntry, PropagateError> {
    let invalid = |message: String| PropagateError::InvalidTle {
        file: source.to_string(),
        message,
    };

    let elements = Elements::from_tle(title.clone(), line1.as_bytes(), line2.as_bytes())
        .map_err(|e| invalid(e.to_string()))?;
    let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

    Ok(TleEntry {
        info: SatelliteInfo {
            name: title.unwrap_or_else(|| format!("NORAD {}", elements.norad_id)),
            norad_id: elements.norad_id as u32,
            tle_source: source.to_string(),
        },
        elements,
        constants,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

    const ISS_ELEMENTS: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

    #[test]
    fn splits_two_and_three_line_sets() {
        let content = format!("{ISS_TLE}\n{ISS_ELEMENTS}");
        let entries = parse_tle_content(&content, "mixed.tle").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].info.name, "ISS (ZARYA)");
        assert_eq!(entries[1].info.name, "NORAD 25544");
        assert!(entries.iter().all(|e| e.info.tle_source == "mixed.tle"));
    }

    #[test]
    fn strips_celestrak_name_prefix() {
        let content = ISS_TLE.replacen("ISS (ZARYA)", "0 ISS (ZARYA)", 1);
        let entries = parse_tle_content(&content, "3le.txt").unwrap();
        assert_eq!(entries[0].info.name, "ISS (ZARYA)");
    }

    #[test]
    fn skips_stray_lines() {
        let content = format!("# stations\n\n{ISS_TLE}trailing junk\n");
        let entries = parse_tle_content(&content, "stations.tle").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].info.name, "ISS (ZARYA)");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = TleCatalog::from_tle_str(ISS_TLE, "test.tle").unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = catalog.get("iss (zarya)").unwrap();
        assert_eq!(entry.info.norad_id, 25544);
        assert!((entry.period_minutes() - 1440.0 / 15.72125391).abs() < 1e-6);
    }

    #[test]
    fn unknown_name_is_lookup_error() {
        let catalog = TleCatalog::from_tle_str(ISS_TLE, "test.tle").unwrap();
        assert!(matches!(
            catalog.get("HUBBLE"),
            Err(PropagateError::SatelliteNotFound(name)) if name == "HUBBLE"
        ));
    }

    #[test]
    fn load_dir_reads_tle_and_txt_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stations.tle"), ISS_TLE).unwrap();
        fs::write(
            dir.path().join("weather.txt"),
            ISS_TLE.replace("ISS (ZARYA)", "WEATHER SAT"),
        )
        .unwrap();
        fs::write(
            dir.path().join("notes.md"),
            ISS_TLE.replace("ISS (ZARYA)", "IGNORED"),
        )
        .unwrap();
        fs::create_dir(dir.path().join("nested.tle")).unwrap();

        let catalog = TleCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("ISS (ZARYA)").unwrap().info.tle_source, "stations.tle");
        assert_eq!(catalog.get("weather sat").unwrap().info.tle_source, "weather.txt");
        assert!(catalog.get("IGNORED").is_err());
    }

    #[test]
    fn load_dir_skips_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = ISS_TLE.replace("51.6416", "5X.64Y6");
        fs::write(dir.path().join("a_broken.tle"), broken).unwrap();
        fs::write(
            dir.path().join("b_good.tle"),
            ISS_TLE.replace("ISS (ZARYA)", "GOOD SAT"),
        )
        .unwrap();

        let catalog = TleCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("GOOD SAT").is_ok());
        assert!(catalog.get("ISS (ZARYA)").is_err());
    }

    #[test]
    fn later_file_replaces_same_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1_old.tle"), ISS_TLE).unwrap();
        fs::write(dir.path().join("2_new.txt"), ISS_TLE).unwrap();

        let catalog = TleCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("ISS (ZARYA)").unwrap().info.tle_source, "2_new.txt");
    }

    #[test]
    fn missing_directory() {
        let err = TleCatalog::load_dir(Path::new("/nonexistent/tle/dir")).err();
        assert!(matches!(err, Some(PropagateError::DirectoryNotFound(_))));
    }
}
