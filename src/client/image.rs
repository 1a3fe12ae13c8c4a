//! Image URL construction for stored image assets

use super::ClientError;
use crate::content::ImageRef;

const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

/// Builds fetchable URLs for image asset references
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
        }
    }

    /// Resolve an image field to a URL
    ///
    /// Asset ids look like `image-<hash>-<width>x<height>-<format>` and map to
    /// `<cdn>/<project>/<dataset>/<hash>-<width>x<height>.<format>`.
    pub fn url(&self, image: &ImageRef) -> Result<String, ClientError> {
        let asset = image
            .asset
            .as_ref()
            .ok_or_else(|| ClientError::InvalidImageRef("image has no asset".to_string()))?;

        if let Some(url) = asset.url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }

        let reference = asset
            .reference
            .as_deref()
            .ok_or_else(|| ClientError::InvalidImageRef("asset has no reference".to_string()))?;

        let file_name = asset_file_name(reference)?;
        Ok(format!(
            "{}/{}/{}/{}",
            IMAGE_CDN, self.project_id, self.dataset, file_name
        ))
    }
}

/// `image-<hash>-<w>x<h>-<fmt>` -> `<hash>-<w>x<h>.<fmt>`
fn asset_file_name(reference: &str) -> Result<String, ClientError> {
    let invalid = || ClientError::InvalidImageRef(reference.to_string());

    let rest = reference.strip_prefix("image-").ok_or_else(invalid)?;
    let (stem, format) = rest.rsplit_once('-').ok_or_else(invalid)?;
    let (hash, dimensions) = stem.rsplit_once('-').ok_or_else(invalid)?;

    let valid_dimensions = dimensions
        .split_once('x')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());
    if hash.is_empty() || format.is_empty() || !valid_dimensions {
        return Err(invalid());
    }

    Ok(format!("{}-{}.{}", hash, dimensions, format))
}
