//! Test directory preprocessing service
//!
//! Turns a test directory (metadata plus annotated test files) into the judge
//! input file and the expected-output file.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::application::merger::{merge_test, write_terminator, MergeOptions, MergeStats};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{write_structure, MetaDocument, Structure, StructureBuilder};
use crate::infrastructure::traits::FileSystem;

/// Paths of the two files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Judge input (`<base>.inp` by default)
    pub input: PathBuf,
    /// Expected output (`<base>.cor` by default)
    pub expected: PathBuf,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct PreprocessOutput {
    pub paths: OutputPaths,
    pub structure: Structure,
    /// Number of test files merged
    pub tests: usize,
    pub stats: MergeStats,
}

/// Parse a metadata document of any nesting depth.
///
/// Every room adds two JSON levels, so serde_json's default limit would cap
/// chains at about 64 rooms; the stack grows on demand instead.
fn parse_meta(content: &str) -> serde_json::Result<MetaDocument> {
    let mut json = serde_json::Deserializer::from_str(content);
    json.disable_recursion_limit();
    let meta = MetaDocument::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(meta)
}

/// Service building judge input and expected output from a test directory.
pub struct PreprocessService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl PreprocessService {
    /// Create a new preprocessing service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Output paths for a base path given without extension.
    ///
    /// The extension is appended, never substituted: `out/v1.2` becomes
    /// `out/v1.2.inp`.
    pub fn output_paths(&self, base: &Path) -> OutputPaths {
        let with_ext = |ext: &str| {
            let mut name = OsString::from(base.as_os_str());
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        };
        OutputPaths {
            input: with_ext(&self.settings.input_extension),
            expected: with_ext(&self.settings.expected_extension),
        }
    }

    /// Check the test directory and return the path of its metadata file.
    pub fn locate_meta(&self, test_dir: &Path) -> ApplicationResult<PathBuf> {
        if !self.fs.is_dir(test_dir) {
            return Err(ApplicationError::NotADirectory(test_dir.to_path_buf()));
        }
        let meta_path = test_dir.join(&self.settings.meta_file);
        if !self.fs.is_file(&meta_path) {
            return Err(ApplicationError::MetaNotFound {
                dir: test_dir.to_path_buf(),
                file: self.settings.meta_file.clone(),
            });
        }
        Ok(meta_path)
    }

    /// Read and parse the metadata document of a test directory.
    #[instrument(level = "debug", skip(self))]
    pub fn load_meta(&self, test_dir: &Path) -> ApplicationResult<MetaDocument> {
        let meta_path = self.locate_meta(test_dir)?;
        let content = self
            .fs
            .read_to_string(&meta_path)
            .with_path_context("read metadata", &meta_path)?;
        let meta = parse_meta(&content).map_err(|source| ApplicationError::InvalidMeta {
            path: meta_path.clone(),
            source,
        })?;
        debug!("load_meta: root={}, tests={}", meta.structure.id, meta.tests.len());
        Ok(meta)
    }

    /// Build the room structure described by the metadata.
    pub fn build_structure(&self, meta: &MetaDocument) -> ApplicationResult<Structure> {
        let structure = StructureBuilder::new()
            .require_contiguous_ids(self.settings.require_contiguous_ids)
            .build(&meta.structure)?;
        Ok(structure)
    }

    fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            rules: self.settings.line_rules(),
            expected_block_separator: self.settings.expected_block_separator,
        }
    }

    /// Run the full pipeline for `test_dir`, writing next to `output_base`.
    ///
    /// The structure is built before any output file is created, so a
    /// malformed structure leaves no output behind. Failures while merging
    /// tests may leave partially written files.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&self, test_dir: &Path, output_base: &Path) -> ApplicationResult<PreprocessOutput> {
        let meta = self.load_meta(test_dir)?;
        let structure = self.build_structure(&meta)?;
        let paths = self.output_paths(output_base);

        let mut input = self.fs.create(&paths.input).for_output_file(&paths.input)?;
        let mut expected = self
            .fs
            .create(&paths.expected)
            .for_output_file(&paths.expected)?;

        write_structure(&mut input, &structure)
            .with_path_context("write structure", &paths.input)?;

        let stats = self.merge_tests(test_dir, &meta.tests, &mut input, &mut expected)?;

        let terminator = &self.settings.terminator;
        write_terminator(&mut input, terminator)
            .and_then(|_| input.flush())
            .with_path_context("write", &paths.input)?;
        write_terminator(&mut expected, terminator)
            .and_then(|_| expected.flush())
            .with_path_context("write", &paths.expected)?;

        info!(
            "wrote {} and {} ({} rooms, {} tests)",
            paths.input.display(),
            paths.expected.display(),
            structure.len(),
            meta.tests.len()
        );
        Ok(PreprocessOutput {
            paths,
            structure,
            tests: meta.tests.len(),
            stats,
        })
    }

    /// Merge every listed test file, in order, into the two streams.
    pub fn merge_tests(
        &self,
        test_dir: &Path,
        tests: &[String],
        input: &mut dyn Write,
        expected: &mut dyn Write,
    ) -> ApplicationResult<MergeStats> {
        let options = self.merge_options();
        let mut total = MergeStats::default();
        for name in tests {
            let path = test_dir.join(name);
            debug!("merge_tests: {}", path.display());
            let reader = self.fs.open_read(&path).for_test_file(&path)?;
            total += merge_test(reader, input, expected, &options)
                .with_path_context("merge test file", &path)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;

    #[test]
    fn test_output_paths_append_extension() {
        let service = PreprocessService::new(Arc::new(RealFileSystem), Arc::new(Settings::default()));
        let paths = service.output_paths(Path::new("out/v1.2"));
        assert_eq!(paths.input, PathBuf::from("out/v1.2.inp"));
        assert_eq!(paths.expected, PathBuf::from("out/v1.2.cor"));
    }
}
