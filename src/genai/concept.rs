//! Concept: the intermediate artifact between user input and image synthesis.

use serde::{Deserialize, Serialize};

/// Invented movie title and cast shown under a poster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub title: String,
    pub actors: String,
}

/// Output of concept inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Concept {
    Poster {
        metadata: MovieMetadata,
        visual_prompt: String,
    },
    Meme {
        visual_prompt: String,
    },
}

impl Concept {
    pub fn visual_prompt(&self) -> &str {
        match self {
            Concept::Poster { visual_prompt, .. } | Concept::Meme { visual_prompt } => {
                visual_prompt
            }
        }
    }

    pub fn metadata(&self) -> Option<&MovieMetadata> {
        match self {
            Concept::Poster { metadata, .. } => Some(metadata),
            Concept::Meme { .. } => None,
        }
    }

    pub fn into_parts(self) -> (String, Option<MovieMetadata>) {
        match self {
            Concept::Poster {
                metadata,
                visual_prompt,
            } => (visual_prompt, Some(metadata)),
            Concept::Meme { visual_prompt } => (visual_prompt, None),
        }
    }
}

// ---------------------------------------------------------------------------
// Fallbacks
// ---------------------------------------------------------------------------

pub const FALLBACK_TITLE: &str = "Cinema Sócrates";
pub const FALLBACK_ACTORS: &str = "IA Desconocida";

/// Placeholder poster used when inference fails.
pub fn fallback_poster(input: &str) -> Concept {
    Concept::Poster {
        metadata: MovieMetadata {
            title: FALLBACK_TITLE.into(),
            actors: FALLBACK_ACTORS.into(),
        },
        visual_prompt: format!("{input}, movie poster style"),
    }
}

/// Placeholder meme: the raw input is the prompt.
pub fn fallback_meme(input: &str) -> Concept {
    Concept::Meme {
        visual_prompt: input.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Actors {
    Joined(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PosterReply {
    title: String,
    actors: Actors,
    visual_prompt: String,
}

/// Remove a surrounding markdown code fence (```` ```json ```` … ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse the provider's JSON poster reply.
///
/// # Errors
///
/// A description of what was wrong: invalid JSON, a missing field, or a
/// blank field.
pub fn parse_poster_reply(raw: &str) -> Result<Concept, String> {
    let reply: PosterReply =
        serde_json::from_str(strip_code_fence(raw)).map_err(|e| e.to_string())?;

    let actors = match reply.actors {
        Actors::Joined(s) => s,
        Actors::List(list) => list.join(", "),
    };

    let title = reply.title.trim();
    let actors = actors.trim();
    let visual_prompt = reply.visual_prompt.trim();

    if title.is_empty() || actors.is_empty() || visual_prompt.is_empty() {
        return Err("reply has a blank field".into());
    }

    Ok(Concept::Poster {
        metadata: MovieMetadata {
            title: title.to_string(),
            actors: actors.to_string(),
        },
        visual_prompt: visual_prompt.to_string(),
    })
}
