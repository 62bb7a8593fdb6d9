use crate::parser::find_clippings_files;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const DEFAULT_KINDLE_PATH: &str = "/Volumes/Kindle";
const DEFAULT_EXPORT_PATH: &str = "./kindle-clippings.json";

#[derive(Parser, Debug)]
#[command(name = "kindle-clippings")]
#[command(about = "Browse, annotate and export Kindle \"My Clippings.txt\" files")]
pub struct CliArgs {
    /// Clippings text file or a previously exported .json
    #[arg(short, long, global = true)]
    pub input: Option<String>,

    /// Kindle mount point searched for "My Clippings.txt" when --input is not given
    #[arg(short, long, global = true)]
    pub kindle_path: Option<String>,

    /// Where export, delete and note write the resulting JSON
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List books and their clipping counts
    Books,
    /// Print one clipping
    Show {
        #[arg(short, long)]
        book: Option<String>,
        #[arg(short = 'n', long, default_value_t = 0)]
        index: usize,
    },
    /// Write the library as JSON
    Export,
    /// Delete a clipping and export the result
    Delete {
        #[arg(short, long)]
        book: String,
        #[arg(short = 'n', long)]
        index: usize,
    },
    /// Set or clear (with empty text) a clipping's note and export the result
    Note {
        #[arg(short, long)]
        book: String,
        #[arg(short = 'n', long)]
        index: usize,
        #[arg(short, long)]
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_path: Option<PathBuf>,
    pub kindle_path: PathBuf,
    pub output_path: PathBuf,
    pub command: Command,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("No clippings file found under '{0}'. Pass --input or set CLIPPINGS_PATH")]
    ClippingsNotFound(String),
    #[error("Found several clippings files under '{0}', pick one with --input")]
    AmbiguousClippings(String),
}

impl Config {
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        let cli = CliArgs::parse();
        Self::from_args(cli, |key| std::env::var(key).ok())
    }

    fn from_args(cli: CliArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let input_path = cli
            .input
            .or_else(|| env("CLIPPINGS_PATH"))
            .map(PathBuf::from);

        let kindle_path = cli
            .kindle_path
            .or_else(|| env("KINDLE_PATH"))
            .unwrap_or_else(|| DEFAULT_KINDLE_PATH.to_string());

        let output_path = cli
            .output
            .or_else(|| env("EXPORT_PATH"))
            .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string());

        Config {
            input_path,
            kindle_path: PathBuf::from(kindle_path),
            output_path: PathBuf::from(output_path),
            command: cli.command,
        }
    }

    /// The explicit input path, or the single clippings file on the Kindle.
    pub fn resolve_input(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.input_path {
            return Ok(path.clone());
        }
        discover(&self.kindle_path)
    }
}

fn discover(kindle_path: &Path) -> Result<PathBuf, ConfigError> {
    let shown = kindle_path.display().to_string();
    let mut found = find_clippings_files(kindle_path);

    match found.len() {
        0 => Err(ConfigError::ClippingsNotFound(shown)),
        1 => Ok(found.remove(0)),
        _ => Err(ConfigError::AmbiguousClippings(shown)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn make_cli(input: Option<&str>, kindle: Option<&str>, output: Option<&str>) -> CliArgs {
        CliArgs {
            input: input.map(String::from),
            kindle_path: kindle.map(String::from),
            output: output.map(String::from),
            command: Command::Books,
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_paths() {
        let config = Config::from_args(make_cli(None, None, None), no_env);

        assert_eq!(config.input_path, None);
        assert_eq!(config.kindle_path, PathBuf::from("/Volumes/Kindle"));
        assert_eq!(config.output_path, PathBuf::from("./kindle-clippings.json"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("CLIPPINGS_PATH", "/tmp/clips.txt"),
            ("KINDLE_PATH", "/media/kindle"),
            ("EXPORT_PATH", "/tmp/out.json"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_args(make_cli(None, None, None), |k| {
            vars.get(k).map(|v| v.to_string())
        });

        assert_eq!(config.input_path, Some(PathBuf::from("/tmp/clips.txt")));
        assert_eq!(config.kindle_path, PathBuf::from("/media/kindle"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.json"));
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = make_cli(Some("a.txt"), Some("/mnt/k"), Some("b.json"));

        let config = Config::from_args(cli, |_| Some("from-env".to_string()));

        assert_eq!(config.input_path, Some(PathBuf::from("a.txt")));
        assert_eq!(config.kindle_path, PathBuf::from("/mnt/k"));
        assert_eq!(config.output_path, PathBuf::from("b.json"));
    }

    #[test]
    fn test_parses_subcommand() {
        let cli = CliArgs::try_parse_from([
            "kindle-clippings",
            "note",
            "--book",
            "Dune",
            "-n",
            "2",
            "--text",
            "hello",
            "-o",
            "out.json",
        ])
        .unwrap();

        let config = Config::from_args(cli, no_env);

        assert_eq!(
            config.command,
            Command::Note {
                book: "Dune".to_string(),
                index: 2,
                text: "hello".to_string(),
            }
        );
        assert_eq!(config.output_path, PathBuf::from("out.json"));
    }

    #[test]
    fn test_resolve_explicit_input() {
        let config = Config::from_args(make_cli(Some("clips.txt"), None, None), no_env);

        assert_eq!(config.resolve_input(), Ok(PathBuf::from("clips.txt")));
    }

    #[test]
    fn test_resolve_discovers_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let documents = dir.path().join("documents");
        fs::create_dir_all(&documents).unwrap();
        fs::write(documents.join("My Clippings.txt"), "").unwrap();
        let kindle = dir.path().to_str().unwrap();

        let config = Config::from_args(make_cli(None, Some(kindle), None), no_env);

        assert_eq!(config.resolve_input(), Ok(documents.join("My Clippings.txt")));
    }

    #[test]
    fn test_resolve_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let kindle = dir.path().to_str().unwrap();

        let config = Config::from_args(make_cli(None, Some(kindle), None), no_env);

        assert!(matches!(
            config.resolve_input(),
            Err(ConfigError::ClippingsNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["documents", "backup"] {
            let path = dir.path().join(sub);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("My Clippings.txt"), "").unwrap();
        }
        let kindle = dir.path().to_str().unwrap();

        let config = Config::from_args(make_cli(None, Some(kindle), None), no_env);

        assert!(matches!(
            config.resolve_input(),
            Err(ConfigError::AmbiguousClippings(_))
        ));
    }
}
