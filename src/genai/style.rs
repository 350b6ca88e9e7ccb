//! Artifact style and poster genre selectors.

use serde::{Deserialize, Serialize};

/// What kind of image the Cine panel produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArtifactStyle {
    /// Movie poster with invented title and cast.
    #[default]
    Poster,
    /// Square meme image.
    Meme,
}

impl ArtifactStyle {
    pub fn label(self) -> &'static str {
        match self {
            ArtifactStyle::Poster => "PÓSTER CINE",
            ArtifactStyle::Meme => "MEME",
        }
    }

    /// Aspect ratio requested from the image model.
    pub fn aspect_ratio(self) -> &'static str {
        match self {
            ArtifactStyle::Poster => "3:4",
            ArtifactStyle::Meme => "1:1",
        }
    }
}

/// Visual genre of a poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Genre {
    /// Blockbuster, photorealistic.
    #[default]
    Epic,
    /// A24, abstract, symbolic.
    Indie,
    /// 70s/80s, painted, grainy.
    Retro,
    /// Black and white, shadowy.
    Noir,
    /// Neon, surreal, geometric.
    SciFi,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Epic,
        Genre::Indie,
        Genre::Retro,
        Genre::Noir,
        Genre::SciFi,
    ];

    /// Upper-case code embedded in prompts.
    pub fn code(self) -> &'static str {
        match self {
            Genre::Epic => "EPIC",
            Genre::Indie => "INDIE",
            Genre::Retro => "RETRO",
            Genre::Noir => "NOIR",
            Genre::SciFi => "SCIFI",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Epic => "Épico",
            Genre::Indie => "Indie",
            Genre::Retro => "Retro",
            Genre::Noir => "Noir",
            Genre::SciFi => "Sci-Fi",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_is_portrait_meme_is_square() {
        assert_eq!(ArtifactStyle::Poster.aspect_ratio(), "3:4");
        assert_eq!(ArtifactStyle::Meme.aspect_ratio(), "1:1");
    }

    #[test]
    fn genre_codes_are_unique() {
        let mut codes: Vec<_> = Genre::ALL.iter().map(|g| g.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Genre::ALL.len());
    }
}
