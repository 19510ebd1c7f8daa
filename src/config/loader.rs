use crate::config::schema::{OutputConfig, RunConfig, default_table_name};
use crate::error::{Error, Result};
use crate::output::{
    RecordSink, console::ConsoleSink, csv::CsvSink, json::JsonSink, sqlite::SqliteSink,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::Validate;

/// Environment override for the sqlite sink path, applied after the file is
/// parsed and before validation.
pub const DATABASE_ENV: &str = "SCOUT_DATABASE";

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let mut config = Self::load_file(path.as_ref())?;
        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<RunConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config: RunConfig = serde_json::from_str(&content)?;
                Ok(config)
            }
            Some("yaml") | Some("yml") => {
                let config: RunConfig = serde_yaml::from_str(&content)?;
                Ok(config)
            }
            Some("toml") => {
                let config: RunConfig = toml::from_str(&content)?;
                Ok(config)
            }
            _ => Err(Error::Config(format!(
                "Unsupported file extension: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(config: &mut RunConfig) {
        if let Ok(db_path) = std::env::var(DATABASE_ENV) {
            let table = match &config.output {
                Some(OutputConfig::Sqlite { table, .. }) => table.clone(),
                _ => default_table_name(),
            };
            config.output = Some(OutputConfig::Sqlite {
                path: db_path,
                table,
            });
        }
    }

    /// Builds the configured sink. Connecting happens here, before any task
    /// is submitted, so an unreachable backend fails the run up front.
    pub async fn create_sink(
        config: &RunConfig,
        multi: Option<Arc<indicatif::MultiProgress>>,
    ) -> Result<Box<dyn RecordSink>> {
        let sink: Box<dyn RecordSink> = match &config.output {
            Some(OutputConfig::Console) | None => Box::new(ConsoleSink::new(multi)),
            Some(OutputConfig::Json { path }) => Box::new(JsonSink::new(PathBuf::from(path))?),
            Some(OutputConfig::Csv { path }) => Box::new(CsvSink::new(PathBuf::from(path))?),
            Some(OutputConfig::Sqlite { path, table }) => {
                Box::new(SqliteSink::new(PathBuf::from(path), table.clone()).await?)
            }
        };
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "run.toml",
            r#"
name = "news"
urls = ["https://example.com/a", "https://example.com/b"]
"#,
        );

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.name, "news");
        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.workers, 10);
        assert!(config.adaptive);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.snippet_chars, 200);
        assert_eq!(config.max_latency_secs, 2.0);
        assert_eq!(config.max_failures, 3);
    }

    #[test]
    fn loads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();

        let json = write_config(
            &dir,
            "run.json",
            r#"{"urls": ["https://example.com"], "workers": 4, "adaptive": false}"#,
        );
        let config = ConfigLoader::load(&json).unwrap();
        assert_eq!(config.workers, 4);
        assert!(!config.adaptive);

        let yaml = write_config(
            &dir,
            "run.yaml",
            "urls:\n  - https://example.com\nworkers: 2\n",
        );
        let config = ConfigLoader::load(&yaml).unwrap();
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn rejects_empty_url_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.toml", "urls = []\n");
        assert!(matches!(
            ConfigLoader::load(&path),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_unparseable_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.toml", "urls = [\"not a url\"]\n");
        assert!(matches!(
            ConfigLoader::load(&path),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "run.toml",
            "urls = [\"https://example.com\"]\nworkers = 0\n",
        );
        assert!(matches!(
            ConfigLoader::load(&path),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_negative_max_latency() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "run.toml",
            "urls = [\"https://example.com\"]\nmax_latency_secs = -1.0\n",
        );
        assert!(matches!(
            ConfigLoader::load(&path),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_non_finite_max_latency() {
        let dir = tempfile::tempdir().unwrap();
        let nan = write_config(
            &dir,
            "run.yaml",
            "urls:\n  - https://example.com\nmax_latency_secs: .nan\n",
        );
        assert!(matches!(
            ConfigLoader::load(&nan),
            Err(Error::Validation(_))
        ));

        let inf = write_config(
            &dir,
            "run2.yaml",
            "urls:\n  - https://example.com\nmax_latency_secs: .inf\n",
        );
        assert!(matches!(
            ConfigLoader::load(&inf),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn env_var_overrides_sink_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.toml", "urls = [\"https://example.com\"]\n");

        unsafe { std::env::set_var(DATABASE_ENV, "/tmp/override.db") };
        let config = ConfigLoader::load(&path).unwrap();
        unsafe { std::env::remove_var(DATABASE_ENV) };

        match config.output {
            Some(OutputConfig::Sqlite { path, table }) => {
                assert_eq!(path, "/tmp/override.db");
                assert_eq!(table, "fetch_results");
            }
            other => panic!("expected sqlite output, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.ini", "urls = [\"https://example.com\"]\n");
        assert!(matches!(ConfigLoader::load(&path), Err(Error::Config(_))));
    }
}
