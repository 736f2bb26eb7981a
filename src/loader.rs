use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::LoadError;
use crate::quiz::QuestionBank;

/// Reads and parses a question bank off the frame loop. The result is picked
/// up by polling once per frame.
pub struct BankLoader {
    path: PathBuf,
    rx: Option<Receiver<Result<QuestionBank, LoadError>>>,
}

impl BankLoader {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("bank-loader".into())
            .spawn(move || {
                let result = QuestionBank::load_from_path(&worker_path);
                // The receiver is gone only if the app already shut down.
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            log::error!("Failed to start loader thread: {}", e);
        }

        Self { path, rx: Some(rx) }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the completion message exactly once. `None` while the read is
    /// still running and after the message was delivered.
    pub fn poll(&mut self) -> Option<Result<QuestionBank, LoadError>> {
        let rx = self.rx.as_ref()?;
        let message = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Fetch {
                path: self.path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "loader stopped without a result",
                ),
            }),
        };
        self.rx = None;
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut BankLoader) -> Result<QuestionBank, LoadError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn delivers_bank_once() {
        let path = std::env::temp_dir().join(format!("quiz_canvas_loader_{}.csv", std::process::id()));
        std::fs::write(&path, "h\nQ1,a,b,c,d,A\nQ2,a,b,c,d,B\n").unwrap();

        let mut loader = BankLoader::spawn(path.clone());
        let bank = wait_for(&mut loader).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(bank.len(), 2);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn missing_file_reports_failure() {
        let path = std::env::temp_dir().join("quiz_canvas_loader_missing.csv");
        let mut loader = BankLoader::spawn(path);
        assert!(matches!(wait_for(&mut loader), Err(LoadError::Fetch { .. })));
    }
}
