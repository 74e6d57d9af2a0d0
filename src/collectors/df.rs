use super::Sampler;
use crate::error::SamplingError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs `df --output=pcent -- <path>` and parses the percentage column.
pub struct DfSampler {
    program: String,
}

impl DfSampler {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for DfSampler {
    fn default() -> Self {
        Self::with_program("df")
    }
}

impl Sampler for DfSampler {
    fn sample(&self, path: &Path) -> Result<u8, SamplingError> {
        let out = Command::new(&self.program)
            .arg("--output=pcent")
            .arg("--")
            .arg(path)
            .env("LC_ALL", "C")
            .output()
            .map_err(|source| SamplingError::Spawn { program: self.program.clone(), source })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        debug!("{} output for {}: {:?}", self.program, path.display(), stdout);

        if !out.status.success() {
            return Err(SamplingError::CommandFailed {
                program: self.program.clone(),
                status:  out.status,
                stderr:  String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        parse_pcent(&stdout)
    }
}

/// Extract the used percentage from `df --output=pcent` output.
///
/// Expected shape is a header line followed by one data line, e.g.
/// `"Use%\n 45%\n"`. Only the first data line is read.
pub fn parse_pcent(output: &str) -> Result<u8, SamplingError> {
    let unparsable = || SamplingError::Unparsable { output: output.to_string() };

    let token = output
        .lines()
        .skip(1)
        .find_map(|line| line.split_whitespace().next())
        .ok_or_else(unparsable)?;

    let digits = token.strip_suffix('%').unwrap_or(token);
    let value: u64 = digits.parse().map_err(|_| unparsable())?;
    if value > 100 {
        return Err(SamplingError::OutOfRange { value });
    }
    Ok(value as u8)
}
