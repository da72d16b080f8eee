use std::path::{Path, PathBuf};

mod books;
mod posts;
mod terminal;

use books::Books;
use clap::ArgAction;
use folio::Config;
use posts::Posts;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the content directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Work with blog posts
    Posts(Posts),

    /// Work with the reading list
    Books(Books),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Posts(command) => command.run(root)?,
            Self::Books(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Loads the configuration from `config.toml` under the root, falling back
/// to defaults when the file is absent.
fn load_config(root: &Path) -> Config {
    let path = root.join("config.toml");
    if path.exists() {
        match Config::load(&path) {
            Ok(config) => return config,
            Err(error) => {
                tracing::warn!("Ignoring unreadable config: {error}");
            }
        }
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
    }
    Config::default()
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn arguments_are_well_formed() {
        // Catches duplicate flag names, including collisions between
        // subcommand shorts and the global -v/-r flags.
        Cli::command().debug_assert();
    }

    #[test]
    fn status_rating_coexists_with_the_global_root_flag() {
        let cli = Cli::try_parse_from([
            "folio", "books", "status", "Dune", "read", "--rating", "4.5", "-r", ".",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let config = load_config(tmp.path());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_is_read_from_the_root() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "_version = \"1\"\nposts_dir = \"writing\"\nreading_dir = \"shelf\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path());
        assert_eq!(config.posts_dir, PathBuf::from("writing"));
        assert_eq!(config.reading_dir, PathBuf::from("shelf"));
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "not toml [").unwrap();

        assert_eq!(load_config(tmp.path()), Config::default());
    }
}
