use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::Path,
};

use anyhow::Context;
use blockfall_evaluator::FeatureWeights;
use blockfall_training::{JsonModelLoader, ModelLoader as _};

/// JSON destination: stdout, or a file when a path is given.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>),
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let (mut output, target) = match output_path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                (Output::File(BufWriter::new(file)), path.display().to_string())
            }
            None => (Output::Stdout(io::stdout().lock()), "stdout".to_owned()),
        };
        serde_json::to_writer_pretty(&mut output, value)
            .with_context(|| format!("Failed to write JSON to {target}"))?;
        writeln!(output).with_context(|| format!("Failed to write JSON to {target}"))?;
        output
            .flush()
            .with_context(|| format!("Failed to flush output to {target}"))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File(writer) => writer.flush(),
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

/// Weights from a model file, or the built-in defaults without one.
pub fn load_weights(model_path: Option<&Path>) -> anyhow::Result<FeatureWeights> {
    let Some(path) = model_path else {
        return Ok(FeatureWeights::DEFAULT);
    };
    let weights = JsonModelLoader
        .load(path)
        .with_context(|| format!("Failed to load AI model: {}", path.display()))?;
    Ok(weights)
}
