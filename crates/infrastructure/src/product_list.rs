use domain::{DomainError, RhelProductList};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// RHEL engineering product IDs read from a text file
///
/// One ID per line; blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, Default)]
pub struct FileRhelProductList {
    ids: HashSet<String>,
}

impl FileRhelProductList {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidConfiguration(format!(
                "Unable to read RHEL product list {}: {}",
                path.display(),
                e
            ))
        })?;

        let list = Self::parse(&contents);
        info!(path = %path.display(), products = list.len(), "Loaded RHEL product list");
        Ok(list)
    }

    pub fn parse(contents: &str) -> Self {
        Self::from_ids(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl RhelProductList for FileRhelProductList {
    fn contains(&self, eng_product_id: &str) -> bool {
        self.ids.contains(eng_product_id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
