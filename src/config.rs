#![forbid(unsafe_code)]

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use directories::BaseDirs;

use crate::error::ConfigError;
use crate::fs_ops::{FileSystem, LocalFs, StatKind, normalize};

/// Environment variable naming a log file when `--log-file` is absent.
pub const LOG_ENV: &str = "FRANKENLISTER_LOG";

#[derive(Debug, Parser)]
#[command(name = "frankenlister", version, about = "Keyboard-driven terminal directory browser")]
pub struct Cli {
    /// Directory to open (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Directory above which going up is refused (defaults to your home)
    #[arg(long, value_name = "DIR")]
    pub boundary: Option<PathBuf>,

    /// Write a debug log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `frankenlister=trace`
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub start_dir: PathBuf,
    pub boundary: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn resolve() -> Result<Self, ConfigError> {
        let cli = Cli::parse();
        let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let env_log = env::var_os(LOG_ENV).map(PathBuf::from);
        Self::from_cli(cli, &cwd, home, env_log, &LocalFs)
    }

    /// Relative paths resolve against `cwd`. The start directory must exist.
    /// Both directories are canonicalized so they compare equal to what
    /// `current_dir` reports, even when `$HOME` is reached through a symlink.
    pub fn from_cli<F: FileSystem>(
        cli: Cli,
        cwd: &Path,
        home: Option<PathBuf>,
        env_log: Option<PathBuf>,
        fs: &F,
    ) -> Result<Self, ConfigError> {
        let start_dir = match cli.dir {
            Some(dir) => normalize(cwd, &dir),
            None => cwd.to_path_buf(),
        };
        match fs.stat(&start_dir) {
            Ok(stat) if stat.kind == StatKind::Dir => {}
            _ => return Err(ConfigError::StartDir(start_dir)),
        }
        let start_dir = fs.canonicalize(&start_dir).unwrap_or(start_dir);
        let boundary = match cli.boundary {
            Some(dir) => normalize(cwd, &dir),
            None => home.unwrap_or_else(|| PathBuf::from("/")),
        };
        let boundary = fs.canonicalize(&boundary).unwrap_or(boundary);
        let log_file = cli
            .log_file
            .or(env_log)
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| normalize(cwd, &path));
        Ok(Self { start_dir, boundary, log_file, log_level: cli.log_level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::fake::FakeFs;

    fn fs() -> FakeFs {
        FakeFs::new().dir("/home/ana/src/app").file("/home/ana/notes.txt", 3)
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("frankenlister").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_cwd_and_home() {
        let config = Config::from_cli(
            parse(&[]),
            Path::new("/home/ana/src"),
            Some(PathBuf::from("/home/ana")),
            None,
            &fs(),
        )
        .unwrap();
        assert_eq!(config.start_dir, Path::new("/home/ana/src"));
        assert_eq!(config.boundary, Path::new("/home/ana"));
        assert_eq!(config.log_file, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn relative_arguments_resolve_against_cwd() {
        let config = Config::from_cli(
            parse(&["app", "--boundary", "..", "--log-file", "run.log", "--log-level", "debug"]),
            Path::new("/home/ana/src"),
            None,
            None,
            &fs(),
        )
        .unwrap();
        assert_eq!(config.start_dir, Path::new("/home/ana/src/app"));
        assert_eq!(config.boundary, Path::new("/home/ana"));
        assert_eq!(config.log_file.as_deref(), Some(Path::new("/home/ana/src/run.log")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_home_falls_back_to_root() {
        let config = Config::from_cli(parse(&[]), Path::new("/home/ana"), None, None, &fs()).unwrap();
        assert_eq!(config.boundary, Path::new("/"));
    }

    #[test]
    fn log_file_flag_wins_over_environment() {
        let env_log = Some(PathBuf::from("/tmp/env.log"));
        let config =
            Config::from_cli(parse(&[]), Path::new("/home/ana"), None, env_log.clone(), &fs()).unwrap();
        assert_eq!(config.log_file.as_deref(), Some(Path::new("/tmp/env.log")));

        let config = Config::from_cli(
            parse(&["--log-file", "/tmp/flag.log"]),
            Path::new("/home/ana"),
            None,
            env_log,
            &fs(),
        )
        .unwrap();
        assert_eq!(config.log_file.as_deref(), Some(Path::new("/tmp/flag.log")));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_home_matches_the_resolved_working_directory() {
        use crate::directory::DirectoryModel;

        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("real-home");
        std::fs::create_dir(&real).unwrap();
        let link = tmp.path().join("home-link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let resolved = std::fs::canonicalize(&real).unwrap();

        let config = Config::from_cli(parse(&[]), &resolved, Some(link.clone()), None, &LocalFs).unwrap();
        assert_eq!(config.boundary, resolved);

        let explicit = Config::from_cli(
            parse(&[link.to_str().unwrap(), "--boundary", link.to_str().unwrap()]),
            &resolved,
            None,
            None,
            &LocalFs,
        )
        .unwrap();
        assert_eq!(explicit.start_dir, resolved);
        assert_eq!(explicit.boundary, resolved);

        let mut model = DirectoryModel::new(LocalFs, &config.start_dir, &config.boundary);
        model.reload().unwrap();
        assert!(model.at_boundary());
    }

    #[test]
    fn start_dir_must_be_a_directory() {
        for arg in ["notes.txt", "missing"] {
            let err = Config::from_cli(parse(&[arg]), Path::new("/home/ana"), None, None, &fs()).unwrap_err();
            assert!(matches!(err, ConfigError::StartDir(_)), "{arg}");
        }
    }
}
