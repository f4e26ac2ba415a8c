use crate::error::CarbonforgeError;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// Reads and deserializes one YAML file.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, CarbonforgeError> {
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| CarbonforgeError::FileIO(display.clone(), e))?;
    serde_yaml::from_str(&content).map_err(|e| CarbonforgeError::YamlParsing(display, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonforge_schemas::file_formats::ScoreFile;

    fn scratch(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("carbonforge-{}-{}", std::process::id(), name));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_a_score_sheet() {
        let path = scratch(
            "scores.yaml",
            "schema_version: \"1\"\nassessment_id: a-1\nscored_by: reviewer\nscores:\n  environmental: [3, 3, 2, null, 1, 3, 3]\n",
        );
        let file: ScoreFile = read_yaml(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(file.assessment_id, "a-1");
        assert_eq!(file.scores.environmental[3], None);
        assert_eq!(file.scores.social, [None; 12]);
    }

    #[test]
    fn errors_name_the_file() {
        let missing = std::env::temp_dir().join("carbonforge-does-not-exist.yaml");
        let err = read_yaml::<ScoreFile>(&missing).unwrap_err();
        assert!(matches!(err, CarbonforgeError::FileIO(ref path, _) if path.ends_with("carbonforge-does-not-exist.yaml")));

        let path = scratch("bad.yaml", "schema_version: \"1\"\nassessment_id: a-1\nscores:\n  governance: [4]\n");
        let err = read_yaml::<ScoreFile>(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, CarbonforgeError::YamlParsing(..)));
    }
}
