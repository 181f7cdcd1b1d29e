use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use super::types::ProjectConfig;

/// A project file together with the directory it was loaded from.
///
/// Paths inside the project are relative to that directory.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Read and parse a project file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project file: {}", path.display()))?;

        let config: ProjectConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse project file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        debug!(
            "Loaded project {} (version {}, {} input patterns)",
            path.display(),
            config.version,
            config.input.len()
        );

        Ok(Self { config, config_dir })
    }

    /// Resolve input entries to paths, expanding glob patterns.
    ///
    /// Each pattern's matches are sorted; patterns keep their listed order.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            if !is_glob_pattern(pattern) {
                results.push(self.config_dir.join(pattern));
                continue;
            }

            let full_pattern = self.config_dir.join(pattern);
            let mut matches = glob::glob(&full_pattern.to_string_lossy())
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("failed to read glob entry: {}", pattern))?;

            if matches.is_empty() {
                warn!("Pattern '{}' matched no files", pattern);
            }
            matches.sort();
            results.extend(matches);
        }

        Ok(results)
    }

    /// Resolve the output directory relative to the project file.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("sprites/**/*.png"));
        assert!(is_glob_pattern("sprite?.png"));
        assert!(is_glob_pattern("sprite[0-9].png"));
        assert!(!is_glob_pattern("sprites/hero.png"));
    }

    #[test]
    fn test_load_and_resolve() {
        let dir = std::env::temp_dir().join(format!("atlaspack-project-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("sprites")).unwrap();
        for name in ["b.png", "a.png", "skip.txt"] {
            std::fs::write(dir.join("sprites").join(name), b"").unwrap();
        }

        let project = dir.join("game.atlaspack");
        std::fs::write(
            &project,
            r#"{"input": ["sprites/*.png", "extra/hero.png"], "output_dir": "out", "max_size": 1024}"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&project).unwrap();
        assert_eq!(loaded.config.max_size, 1024);
        assert_eq!(loaded.resolve_output_dir(), dir.join("out"));

        let inputs = loaded.resolve_inputs().unwrap();
        assert_eq!(
            inputs,
            vec![
                dir.join("sprites/a.png"),
                dir.join("sprites/b.png"),
                dir.join("extra/hero.png"),
            ]
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!("atlaspack-bad-{}.atlaspack", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = LoadedConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse project file"));

        std::fs::remove_file(&path).unwrap();
    }
}
