use crate::viewport::Raster;

/// What the content area shows.
#[derive(Debug, Clone)]
pub enum PreviewBody {
    Image(Raster),
    /// The view cannot be previewed; the reason is shown to the user.
    Placeholder(String),
    /// Something went wrong producing or loading the raster.
    Error(String),
}

impl PreviewBody {
    /// In-window text for non-image bodies.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Image(_) => None,
            Self::Placeholder(reason) | Self::Error(reason) => {
                Some(format!("Preview not available: {reason}"))
            }
        }
    }
}

/// One complete frame of preview content. Applying it replaces whatever the
/// window showed before.
#[derive(Debug, Clone)]
pub struct PreviewContent {
    pub title: String,
    pub subtype: String,
    pub body: PreviewBody,
}

impl PreviewContent {
    pub fn new(title: impl Into<String>, subtype: impl Into<String>, body: PreviewBody) -> Self {
        Self {
            title: title.into(),
            subtype: subtype.into(),
            body,
        }
    }

    pub fn image(title: impl Into<String>, subtype: impl Into<String>, raster: Raster) -> Self {
        Self::new(title, subtype, PreviewBody::Image(raster))
    }

    pub fn placeholder(
        title: impl Into<String>,
        subtype: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(title, subtype, PreviewBody::Placeholder(reason.into()))
    }

    pub fn error(
        title: impl Into<String>,
        subtype: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(title, subtype, PreviewBody::Error(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_message() {
        let content = PreviewContent::placeholder("Door Schedule", "Schedule", "unsupported view type");
        assert_eq!(
            content.body.message().as_deref(),
            Some("Preview not available: unsupported view type")
        );
    }

    #[test]
    fn test_image_has_no_message() {
        let content = PreviewContent::image("Level 1", "Floor Plan", Raster::new(1, 1));
        assert!(content.body.message().is_none());
    }
}
