//! Movie model for reelsync.
//!
//! A movie is identified by its title. Rating, release year and genre are
//! required; the poster image is always optional and its absence is handled
//! by falling back to [`PLACEHOLDER_IMAGE`].

use serde::Serialize;

/// Asset reference shown whenever a movie has no image bytes.
pub const PLACEHOLDER_IMAGE: &str = "placeholder.png";

/// A validated movie record.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    /// Title, unique across the collection
    pub title: String,

    /// Rating as published by the endpoint (e.g. 8.3)
    pub rating: f64,

    /// Release year
    pub release_year: i32,

    /// Ordered genre tags
    pub genre: Vec<String>,

    /// Where the poster can be fetched from, if the document named one.
    ///
    /// Not persisted; only meaningful between decode and image fetch.
    pub image_location: Option<String>,

    /// Raw poster bytes, attached after a successful image fetch
    pub image: Option<Vec<u8>>,
}

impl Movie {
    /// Create a movie without image data.
    pub fn new(title: impl Into<String>, rating: f64, release_year: i32, genre: Vec<String>) -> Self {
        Self {
            title: title.into(),
            rating,
            release_year,
            genre,
            image_location: None,
            image: None,
        }
    }

    /// Builder-style setter for the image locator.
    #[must_use]
    pub fn with_image_location(mut self, location: impl Into<String>) -> Self {
        self.image_location = Some(location.into());
        self
    }

    /// Image bytes, or the placeholder asset when none were fetched.
    #[must_use]
    pub fn image_or_placeholder(&self) -> ImageSource<'_> {
        match &self.image {
            Some(bytes) => ImageSource::Bytes(bytes),
            None => ImageSource::Placeholder(PLACEHOLDER_IMAGE),
        }
    }
}

/// What the presentation layer should draw for a movie's poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Bytes(&'a [u8]),
    Placeholder(&'static str),
}

impl ImageSource<'_> {
    /// Short human-readable description ("12345 bytes" or the asset name).
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes(bytes) => format!("{} bytes", bytes.len()),
            Self::Placeholder(asset) => (*asset).to_string(),
        }
    }
}

/// Durable row layout of a movie inside the local store.
///
/// Genre is comma-joined and the image is a nullable blob.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub title: String,
    pub rating: f64,
    pub release_year: i32,
    pub genre: String,
    pub image: Option<Vec<u8>>,
}

/// Presentation view of a single movie (list rows and the details screen).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub title: String,
    pub rating: f64,
    pub release_year: i32,
    pub genre: Vec<String>,
    pub has_image: bool,
    /// Size of the poster in bytes, 0 when the placeholder is used
    pub image_size: usize,
    /// Placeholder asset name when no image is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl From<&Movie> for MovieDetails {
    fn from(movie: &Movie) -> Self {
        let (has_image, image_size, placeholder) = match movie.image_or_placeholder() {
            ImageSource::Bytes(bytes) => (true, bytes.len(), None),
            ImageSource::Placeholder(asset) => (false, 0, Some(asset)),
        };

        Self {
            title: movie.title.clone(),
            rating: movie.rating,
            release_year: movie.release_year,
            genre: movie.genre.clone(),
            has_image,
            image_size,
            placeholder,
        }
    }
}
