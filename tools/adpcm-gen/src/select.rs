//! Sample file selection
//!
//! Lists one directory (no recursion), keeps regular files with the sample
//! extension and orders them by file name so the generated header is stable
//! across runs and platforms.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{Error, Result};

/// A selected input file and the symbol derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFile {
    pub path: PathBuf,
    /// Symbolic name used for the enum constant and array
    pub name: String,
}

/// Select sample files from `dir`, sorted by file name
pub fn select_samples(dir: &Path, extension: &str) -> Result<Vec<SampleFile>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Err(Error::DirectoryNotFound(dir.to_path_buf()));
        }
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut matched: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        let Ok(file_name) = entry.file_name().into_string() else {
            tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        if !has_extension(&file_name, extension) {
            continue;
        }

        // Follow symlinks; anything but a regular file is ignored
        let metadata = std::fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        if !metadata.is_file() {
            continue;
        }

        matched.push((file_name, path));
    }

    matched.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut samples = Vec::with_capacity(matched.len());
    for (file_name, path) in matched {
        let name = symbol_name(&file_name).ok_or_else(|| Error::InvalidName(path.clone()))?;
        if let Some(first) = seen.get(&name) {
            return Err(Error::DuplicateName {
                name,
                first: first.clone(),
                second: path,
            });
        }
        seen.insert(name.clone(), path.clone());
        samples.push(SampleFile { path, name });
    }

    tracing::debug!(
        "Selected {} sample(s) from {}",
        samples.len(),
        dir.display()
    );

    Ok(samples)
}

/// Check that every identifier the header will declare is valid and unique
///
/// Covers the enum constants, the count constant, the arrays, the record
/// type and the pointer table.
pub fn check_symbols(samples: &[SampleFile], output: &OutputConfig) -> Result<()> {
    // identifier -> what declares it
    let mut declared: HashMap<String, String> = HashMap::new();
    declared.insert(output.type_name.clone(), "the record type".to_string());
    declared.insert(output.table_name.clone(), "the pointer table".to_string());
    declared.insert(output.count_symbol(), "the sample count".to_string());

    for sample in samples {
        for symbol in [
            output.enum_symbol(&sample.name),
            output.array_symbol(&sample.name),
        ] {
            // Names are already sanitized, so only a leading digit can break them
            if symbol.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(Error::InvalidSymbol {
                    symbol,
                    path: sample.path.clone(),
                });
            }
            if let Some(other) = declared.get(&symbol) {
                return Err(Error::SymbolClash {
                    symbol,
                    path: sample.path.clone(),
                    other: other.clone(),
                });
            }
            declared.insert(symbol, sample.path.display().to_string());
        }
    }

    Ok(())
}

/// Case-insensitive `.ext` suffix match. A bare `.wav` has no stem and is skipped.
fn has_extension(file_name: &str, extension: &str) -> bool {
    let suffix_len = extension.len() + 1;
    if file_name.len() <= suffix_len {
        return false;
    }
    let Some(suffix) = file_name.get(file_name.len() - suffix_len..) else {
        return false;
    };
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension)
}

/// Derive a C-safe symbol from a file name
///
/// Takes everything before the first `.` and maps characters outside
/// `[A-Za-z0-9_]` to `_`. Returns `None` when nothing is left.
pub fn symbol_name(file_name: &str) -> Option<String> {
    let stem = file_name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return None;
    }

    Some(
        stem.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"RIFF").unwrap();
    }

    fn names(samples: &[SampleFile]) -> Vec<&str> {
        samples.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_file_name() {
        let dir = tempdir().unwrap();
        for name in ["b.wav", "a.wav", "c.wav"] {
            touch(dir.path(), name);
        }

        let samples = select_samples(dir.path(), "wav").unwrap();
        assert_eq!(names(&samples), ["a", "b", "c"]);
        assert_eq!(samples[0].path, dir.path().join("a.wav"));
    }

    #[test]
    fn test_ordinal_order_puts_uppercase_first() {
        let dir = tempdir().unwrap();
        for name in ["beep.wav", "Alarm.wav", "_click.wav"] {
            touch(dir.path(), name);
        }

        let samples = select_samples(dir.path(), "wav").unwrap();
        assert_eq!(names(&samples), ["Alarm", "_click", "beep"]);
    }

    #[test]
    fn test_filters_other_files_and_directories() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "one.wav");
        touch(dir.path(), "readme.txt");
        touch(dir.path(), "wav");
        touch(dir.path(), "notes.wav.bak");
        fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let samples = select_samples(dir.path(), "wav").unwrap();
        assert_eq!(names(&samples), ["one"]);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "LOUD.WAV");
        touch(dir.path(), "quiet.wav");

        let samples = select_samples(dir.path(), "wav").unwrap();
        assert_eq!(names(&samples), ["LOUD", "quiet"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(select_samples(dir.path(), "wav").unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = select_samples(&missing, "wav").unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(p) if p == missing));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "one.wav");

        let err = select_samples(&dir.path().join("one.wav"), "wav").unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn test_duplicate_symbols_are_rejected() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "kick.wav");
        touch(dir.path(), "kick.old.wav");

        let err = select_samples(dir.path(), "wav").unwrap_err();
        match err {
            Error::DuplicateName { name, .. } => assert_eq!(name, "kick"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn sample(name: &str) -> SampleFile {
        SampleFile {
            path: PathBuf::from(format!("{name}.wav")),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_check_symbols_accepts_defaults() {
        let samples = [sample("kick"), sample("1up"), sample("snare")];
        check_symbols(&samples, &OutputConfig::default()).unwrap();
    }

    #[test]
    fn test_check_symbols_rejects_count_name() {
        let err = check_symbols(&[sample("COUNT")], &OutputConfig::default()).unwrap_err();
        match err {
            Error::SymbolClash { symbol, other, .. } => {
                assert_eq!(symbol, "ADPCM_COUNT");
                assert_eq!(other, "the sample count");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_symbols_rejects_leading_digit_without_prefix() {
        let output = OutputConfig {
            array_prefix: String::new(),
            ..OutputConfig::default()
        };
        let err = check_symbols(&[sample("1up")], &output).unwrap_err();
        assert!(matches!(err, Error::InvalidSymbol { ref symbol, .. } if symbol == "1up"));

        let output = OutputConfig {
            symbol_prefix: String::new(),
            ..OutputConfig::default()
        };
        assert!(matches!(
            check_symbols(&[sample("1up")], &output),
            Err(Error::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn test_check_symbols_rejects_overlapping_prefixes() {
        // "a_" + "b_kick" and "a_b_" + "kick" both give "a_b_kick"
        let output = OutputConfig {
            symbol_prefix: "a_".to_string(),
            array_prefix: "a_b_".to_string(),
            ..OutputConfig::default()
        };
        let err = check_symbols(&[sample("kick"), sample("b_kick")], &output).unwrap_err();
        assert!(matches!(err, Error::SymbolClash { ref symbol, .. } if symbol == "a_b_kick"));
    }

    #[test]
    fn test_check_symbols_rejects_table_name_clash() {
        let err = check_symbols(&[sample("table")], &OutputConfig::default()).unwrap_err();
        assert!(matches!(err, Error::SymbolClash { ref other, .. } if other == "the pointer table"));
    }

    #[test]
    fn test_symbol_name() {
        assert_eq!(symbol_name("one.wav").as_deref(), Some("one"));
        assert_eq!(symbol_name("two.take2.wav").as_deref(), Some("two"));
        assert_eq!(symbol_name("door-slam 2.wav").as_deref(), Some("door_slam_2"));
        assert_eq!(symbol_name(".wav"), None);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("a.wav", "wav"));
        assert!(has_extension("a.Wav", "wav"));
        assert!(!has_extension("a.wave", "wav"));
        assert!(!has_extension("awav", "wav"));
        assert!(!has_extension(".wav", "wav"));
    }
}
