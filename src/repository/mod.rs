//! Assessment document loading.
//!
//! Reads the gap analysis, requirements and roadmap documents from a data
//! directory. Nothing is cached: every call goes back to disk, so repeated
//! calls see the same result as long as the files do not change.

use crate::error::{DataSourceError, Result, SchemaError};
use crate::models::{GapAnalysisDocument, RequirementsDocument, RoadmapDocument};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names of the three documents, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub gap_analysis: String,
    pub requirements: String,
    pub roadmap: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            gap_analysis: "gap_analysis.json".to_string(),
            requirements: "requirements.json".to_string(),
            roadmap: "roadmap.json".to_string(),
        }
    }
}

impl From<&crate::config::DataConfig> for DataFiles {
    fn from(config: &crate::config::DataConfig) -> Self {
        Self {
            gap_analysis: config.gap_analysis.clone(),
            requirements: config.requirements.clone(),
            roadmap: config.roadmap.clone(),
        }
    }
}

/// Read-only access to the assessment documents.
#[derive(Debug, Clone)]
pub struct AssessmentRepository {
    data_dir: PathBuf,
    files: DataFiles,
}

impl AssessmentRepository {
    /// Create a repository over `data_dir` using the default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            files: DataFiles::default(),
        }
    }

    /// Use explicit file names instead of the defaults.
    pub fn with_files(mut self, files: DataFiles) -> Self {
        self.files = files;
        self
    }

    /// The directory documents are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the gap analysis document.
    pub fn load_gap_analysis(&self) -> Result<GapAnalysisDocument> {
        let doc: GapAnalysisDocument =
            self.read_document(&self.files.gap_analysis, "gap analysis")?;
        debug!(
            "Loaded gap analysis with {} requirements",
            doc.compliance_scores.len()
        );
        Ok(doc)
    }

    /// Load the canonical requirement definitions.
    pub fn load_requirements(&self) -> Result<RequirementsDocument> {
        let doc: RequirementsDocument =
            self.read_document(&self.files.requirements, "requirements")?;

        if !(doc.0.is_array() || doc.0.is_object()) {
            return Err(SchemaError::WrongRoot {
                document: "requirements".to_string(),
                expected: "array or object",
            }
            .into());
        }

        debug!("Loaded {} requirement definitions", doc.len());
        Ok(doc)
    }

    /// Load the remediation roadmap.
    pub fn load_roadmap(&self) -> Result<RoadmapDocument> {
        let doc: RoadmapDocument = self.read_document(&self.files.roadmap, "roadmap")?;
        debug!("Loaded roadmap with {} phases", doc.phases.len());
        Ok(doc)
    }

    /// Read and parse one document, separating I/O, syntax and shape failures.
    fn read_document<T: DeserializeOwned>(&self, file: &str, document: &str) -> Result<T> {
        let path = self.data_dir.join(file);
        debug!("Reading {} from {}", document, path.display());

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataSourceError::NotFound(path.clone()),
            _ => DataSourceError::Unreadable {
                path: path.clone(),
                source: e,
            },
        })?;

        serde_json::from_str(&content).map_err(|e| match e.classify() {
            Category::Data => SchemaError::Mismatch {
                document: document.to_string(),
                source: e,
            }
            .into(),
            Category::Io | Category::Syntax | Category::Eof => {
                DataSourceError::Malformed { path, source: e }.into()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_missing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let repo = AssessmentRepository::new(dir.path());

        let err = repo.load_roadmap().unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::DataSource(DataSourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "gap_analysis.json", "{ \"compliance_scores\": [");
        let repo = AssessmentRepository::new(dir.path());

        let err = repo.load_gap_analysis().unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::DataSource(DataSourceError::Malformed { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_is_schema_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "roadmap.json", r#"{"phases": [{"phase_number": "one"}]}"#);
        let repo = AssessmentRepository::new(dir.path());

        let err = repo.load_roadmap().unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Schema(SchemaError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_requirements_root_must_be_collection() {
        let dir = TempDir::new().unwrap();
        write(&dir, "requirements.json", "42");
        let repo = AssessmentRepository::new(dir.path());

        let err = repo.load_requirements().unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Schema(SchemaError::WrongRoot { .. })
        ));
    }

    #[test]
    fn test_custom_file_names() {
        let dir = TempDir::new().unwrap();
        write(&dir, "reqs-v2.json", r#"[{"id": "ART-9"}]"#);
        let files = DataFiles {
            requirements: "reqs-v2.json".to_string(),
            ..DataFiles::default()
        };
        let repo = AssessmentRepository::new(dir.path()).with_files(files);

        assert_eq!(repo.load_requirements().unwrap().len(), 1);
    }

    #[test]
    fn test_loads_shipped_data_idempotently() {
        let repo = AssessmentRepository::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"));

        let first = repo.load_gap_analysis().unwrap();
        let second = repo.load_gap_analysis().unwrap();
        assert_eq!(first, second);
        assert!(!first.compliance_scores.is_empty());

        let roadmap = repo.load_roadmap().unwrap();
        assert_eq!(roadmap.phases.len(), 4);

        let requirements = repo.load_requirements().unwrap();
        assert!(!requirements.is_empty());
    }
}
