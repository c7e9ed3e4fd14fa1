use std::{
    io::{ErrorKind, Write},
    process::{Command, Stdio},
};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::{preprocess, SentimentModel};
use crate::models::Prediction;

/// Runs an external classifier once per text.
///
/// The preprocessed text goes to the program's stdin; the program must print a
/// single JSON object `{"positivo": p, "neutro": p, "negativo": p}` on stdout and
/// exit with status 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandModel {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandModel {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.program.trim().is_empty()
    }
}

impl SentimentModel for CommandModel {
    fn predict(&self, text: &str) -> Result<Prediction> {
        if !self.is_configured() {
            bail!("no classifier command configured");
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start classifier '{}'", self.program))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| anyhow!("classifier '{}' has no stdin", self.program))?;
            // A classifier that exits without reading its input is reported by its
            // exit status below, not as a broken pipe.
            if let Err(err) = stdin.write_all(preprocess(text).as_bytes()) {
                if err.kind() != ErrorKind::BrokenPipe {
                    return Err(err).with_context(|| {
                        format!("failed to send text to classifier '{}'", self.program)
                    });
                }
            }
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("classifier '{}' did not finish", self.program))?;

        if !output.status.success() {
            bail!(
                "classifier '{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        serde_json::from_slice(&output.stdout).with_context(|| {
            format!(
                "classifier '{}' returned invalid output: {}",
                self.program,
                String::from_utf8_lossy(&output.stdout).trim()
            )
        })
    }
}
