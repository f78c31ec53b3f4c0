use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use fairsplit_core::{BalanceConfig, CandidatePlayer, Formation, FormationCatalog};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads the player pool: a JSON array of players.
pub fn read_players_file<P>(path: P) -> anyhow::Result<Vec<CandidatePlayer>>
where
    P: AsRef<Path>,
{
    read_json_file("players", path)
}

/// Reads a partial configuration document and merges it over the defaults.
///
/// Without a path the defaults are used as is.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<BalanceConfig> {
    let Some(path) = path else {
        return Ok(BalanceConfig::default());
    };
    let overrides: serde_json::Value = read_json_file("config", path)?;
    log::debug!("merging config overrides from {}", path.display());
    BalanceConfig::with_overrides(&overrides)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Reads a custom formation catalog (a JSON array of formations), or returns the
/// built-in one.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<FormationCatalog> {
    let Some(path) = path else {
        return Ok(FormationCatalog::builtin());
    };
    let formations: Vec<Formation> = read_json_file("formations", path)?;
    log::debug!("loaded {} formations from {}", formations.len(), path.display());
    FormationCatalog::from_formations(formations)
        .with_context(|| format!("Invalid formations file: {}", path.display()))
}
