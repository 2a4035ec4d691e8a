use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use lawrace_engine::{MatchCollection, Milestone, MilestoneSet};

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
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)?;
        if let Output::File { path, .. } = &output {
            eprintln!("Output written to: {}", path.display());
        }
        Ok(())
    }

    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path.to_owned()),
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

/// Read a match collection from a JSON file
pub fn read_matches_file<P>(path: P) -> anyhow::Result<MatchCollection>
where
    P: AsRef<Path>,
{
    let collection: MatchCollection = read_json_file("matches", path)?;
    log::debug!("loaded {} matches", collection.matches.len());
    Ok(collection)
}

/// Milestones used when no configuration file is given
pub fn default_milestones() -> Vec<Milestone> {
    vec![Milestone::new("4 laws", 4), Milestone::new("7 laws", 7)]
}

/// Load the milestone configuration, falling back to [`default_milestones`]
///
/// The file holds a JSON array of `{"name": ..., "threshold": ...}` objects;
/// duplicate names or thresholds are rejected while parsing.
pub fn load_milestones(path: Option<&Path>) -> anyhow::Result<MilestoneSet> {
    match path {
        Some(path) => read_json_file("milestone config", path),
        None => Ok(MilestoneSet::new(default_milestones())?),
    }
}

/// Lowest and highest threshold milestones, the pair compared by default
pub fn milestone_span(milestones: &MilestoneSet) -> Option<(&Milestone, &Milestone)> {
    let order = milestones.scan_order();
    if order.len() < 2 {
        return None;
    }
    let all = milestones.as_slice();
    Some((&all[order[0]], &all[order[order.len() - 1]]))
}
