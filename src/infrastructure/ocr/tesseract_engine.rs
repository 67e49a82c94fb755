use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{OcrEngine, OcrEngineError};
use crate::domain::Language;

/// Runs the `tesseract` CLI once per image, piping the encoded image through
/// stdin and reading text from stdout.
pub struct TesseractEngine {
    command: PathBuf,
    tessdata_dir: PathBuf,
    engine_mode: u8,
}

impl TesseractEngine {
    pub fn new(command: PathBuf, tessdata_dir: PathBuf, engine_mode: u8) -> Self {
        Self {
            command,
            tessdata_dir,
            engine_mode,
        }
    }

    fn build_command(&self, language: &Language) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("stdin")
            .arg("stdout")
            .arg("--tessdata-dir")
            .arg(&self.tessdata_dir)
            .arg("--oem")
            .arg(self.engine_mode.to_string())
            .arg("-l")
            .arg(language.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        image: &[u8],
        language: &Language,
    ) -> Result<String, OcrEngineError> {
        let mut child = self.build_command(language).spawn().map_err(|e| {
            OcrEngineError::SpawnFailed(format!("{}: {e}", self.command.display()))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrEngineError::SpawnFailed("stdin not captured".to_string()))?;

        // Feed stdin concurrently with draining stdout/stderr.
        let input = image.to_vec();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OcrEngineError::RecognitionFailed(e.to_string()))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "tesseract closed stdin early"),
            Err(e) => tracing::debug!(error = %e, "stdin writer task failed"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrEngineError::RecognitionFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| OcrEngineError::InvalidOutput(e.to_string()))
    }
}
