use std::{
    collections::HashMap,
    error, fmt, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// An uploaded photo as received from the client.
#[derive(Debug, Clone)]
pub struct Photo {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    /// A file input left empty still submits a part, with no name and no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
            && self
                .file_name
                .as_deref()
                .map_or(true, |name| name.is_empty())
    }
}

#[derive(Debug)]
pub enum PhotoError {
    NotFound,
    InvalidReference(String),
    Io(io::Error),
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "photo not found"),
            Self::InvalidReference(reference) => {
                write!(f, "invalid photo reference {:?}", reference)
            }
            Self::Io(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for PhotoError {}

impl From<io::Error> for PhotoError {
    fn from(why: io::Error) -> Self {
        match why.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(why),
        }
    }
}

pub type Result<T> = std::result::Result<T, PhotoError>;

/// Storage for uploaded photos. A reference returned by `store` stays valid and
/// resolves to the same bytes through `retrieve`.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn store(&self, photo: Photo) -> Result<String>;

    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>>;
}

/// `<unix millis><extension of the uploaded file>`, with `-<attempt>` added
/// when the plain name is already taken.
pub fn candidate_reference(file_name: Option<&str>, millis: i64, attempt: u32) -> String {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|extension| extension.to_str())
        .map(|extension| format!(".{}", extension))
        .unwrap_or_default();
    if attempt == 0 {
        format!("{}{}", millis, extension)
    } else {
        format!("{}-{}{}", millis, attempt, extension)
    }
}

/// References are plain file names, never paths.
pub fn validate_reference(reference: &str) -> Result<()> {
    let valid = !reference.is_empty()
        && !reference.starts_with('.')
        && !reference.contains(['/', '\\', '\0'])
        && !reference.contains("..");
    if valid {
        Ok(())
    } else {
        Err(PhotoError::InvalidReference(reference.to_owned()))
    }
}

/// Keeps photos as files in a single directory.
#[derive(Debug, Clone)]
pub struct DiskPhotoStore {
    directory: PathBuf,
}

impl DiskPhotoStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl PhotoStore for DiskPhotoStore {
    async fn store(&self, photo: Photo) -> Result<String> {
        fs::create_dir_all(&self.directory).await?;
        let millis = Utc::now().timestamp_millis();
        let mut attempt = 0;
        loop {
            let reference =
                candidate_reference(photo.file_name.as_deref(), millis, attempt);
            let path = self.directory.join(&reference);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&photo.bytes).await?;
                    file.flush().await?;
                    log::info!("stored photo {}", path.display());
                    return Ok(reference);
                }
                Err(why) if why.kind() == io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                }
                Err(why) => return Err(PhotoError::Io(why)),
            }
        }
    }

    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>> {
        validate_reference(reference)?;
        Ok(fs::read(self.directory.join(reference)).await?)
    }
}

/// Keeps photos in memory. Used together with the in-memory database.
#[derive(Debug, Default)]
pub struct MemoryPhotoStore {
    photos: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn store(&self, photo: Photo) -> Result<String> {
        let millis = Utc::now().timestamp_millis();
        let mut photos = self.photos.lock().await;
        let mut attempt = 0;
        let mut reference = candidate_reference(photo.file_name.as_deref(), millis, 0);
        while photos.contains_key(&reference) {
            attempt += 1;
            reference =
                candidate_reference(photo.file_name.as_deref(), millis, attempt);
        }
        photos.insert(reference.clone(), photo.bytes);
        Ok(reference)
    }

    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>> {
        validate_reference(reference)?;
        self.photos
            .lock()
            .await
            .get(reference)
            .cloned()
            .ok_or(PhotoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{
        candidate_reference, validate_reference, DiskPhotoStore, MemoryPhotoStore,
        Photo, PhotoError, PhotoStore,
    };

    #[test]
    fn reference_keeps_the_original_extension() {
        assert_eq!(
            candidate_reference(Some("me.JPG"), 1718000000000, 0),
            "1718000000000.JPG"
        );
        assert_eq!(
            candidate_reference(Some("archive.tar.gz"), 5, 2),
            "5-2.gz"
        );
        assert_eq!(candidate_reference(Some("noext"), 5, 0), "5");
        assert_eq!(candidate_reference(None, 5, 1), "5-1");
    }

    #[test]
    fn rejects_path_like_references() {
        assert!(validate_reference("1718000000000.png").is_ok());
        for reference in ["", "../secret", "a/b.png", "..", ".env", "a\\b"] {
            assert!(matches!(
                validate_reference(reference),
                Err(PhotoError::InvalidReference(_))
            ));
        }
    }

    #[test]
    fn empty_file_part_is_no_photo() {
        assert!(Photo::new(Some(String::new()), vec![]).is_empty());
        assert!(Photo::new(None, vec![]).is_empty());
        assert!(!Photo::new(Some("a.png".to_owned()), vec![]).is_empty());
        assert!(!Photo::new(None, vec![1]).is_empty());
    }

    #[tokio::test]
    async fn memory_store_never_reuses_a_reference() {
        let store = MemoryPhotoStore::new();
        let first = store
            .store(Photo::new(Some("a.png".to_owned()), vec![1]))
            .await
            .unwrap();
        let second = store
            .store(Photo::new(Some("b.png".to_owned()), vec![2]))
            .await
            .unwrap();
        assert_ne!(first, second);
        assert_eq!(store.retrieve(&first).await.unwrap(), vec![1]);
        assert_eq!(store.retrieve(&second).await.unwrap(), vec![2]);
        assert!(matches!(
            store.retrieve("0.png").await,
            Err(PhotoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn disk_store_round_trips_files() {
        let directory = env::temp_dir().join(format!(
            "bus-pass-photos-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let store = DiskPhotoStore::new(&directory);

        let first = store
            .store(Photo::new(Some("face.png".to_owned()), b"png".to_vec()))
            .await
            .unwrap();
        let second = store
            .store(Photo::new(Some("face.png".to_owned()), b"other".to_vec()))
            .await
            .unwrap();

        assert!(first.ends_with(".png"));
        assert_ne!(first, second);
        assert_eq!(store.retrieve(&first).await.unwrap(), b"png".to_vec());
        assert_eq!(store.retrieve(&second).await.unwrap(), b"other".to_vec());
        assert!(matches!(
            store.retrieve("missing.png").await,
            Err(PhotoError::NotFound)
        ));
        assert!(directory.join(&first).exists());

        let _ = tokio::fs::remove_dir_all(&directory).await;
    }
}
