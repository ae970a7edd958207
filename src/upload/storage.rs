use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::MultipartError;
use actix_web::web::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::models::UploadedFile;
use crate::upload::UploadError;
use crate::utils;

/// Name collisions are astronomically unlikely, a handful of retries is plenty.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Writes incoming files below a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_file_size: u64,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_file_size: u64) -> Self {
        UploadStore {
            dir: dir.into(),
            max_file_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Opens a freshly named file that did not exist before.
    async fn create_unique(&self, original_name: &str) -> io::Result<(String, PathBuf, File)> {
        let mut last_err = None;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = utils::generate_stored_name(original_name);
            let path = self.dir.join(&name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((name, path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::other("no free upload name")))
    }

    /// Streams one file to disk and returns its public descriptor together
    /// with the number of bytes written. A file over the size limit, or a
    /// broken stream, leaves nothing behind.
    pub async fn store<S>(
        &self,
        original_name: &str,
        mut chunks: S,
    ) -> Result<(UploadedFile, u64), UploadError>
    where
        S: Stream<Item = Result<Bytes, MultipartError>> + Unpin,
    {
        let (name, path, mut file) = self.create_unique(original_name).await?;
        let mut written: u64 = 0;

        let result = async {
            while let Some(chunk) = chunks.next().await {
                let data = chunk?;
                written += data.len() as u64;
                if written > self.max_file_size {
                    return Err(UploadError::TooLarge {
                        limit: self.max_file_size,
                    });
                }
                file.write_all(&data).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(e);
        }
        Ok((UploadedFile::new(name), written))
    }
}
