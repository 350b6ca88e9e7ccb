//! User-facing copy.
//!
//! Every string shown in the error banner or injected as an in-character
//! reply lives here so the localisation stays in one place.  Technical
//! detail never reaches these strings; it goes to the log instead.

/// Poster/meme run failed (image generation exhausted every model).
pub const POSTER_FAILED: &str = "Hubo un error generando la imagen. Por favor intenta otra vez.";

/// Voice capture could not be turned into text.
pub const TRANSCRIPTION_FAILED: &str = "No se pudo transcribir el audio. Probá de nuevo.";

/// Music Hall was submitted with neither a link nor a file.
pub const MUSIC_INPUT_MISSING: &str = "Por favor ingresa un link o sube un archivo.";

/// Music analysis call failed.
pub const MUSIC_FAILED: &str = "No se pudo analizar la obra musical.";

/// Provider answered the music analysis with no text.
pub const MUSIC_EMPTY_REPLY: &str = "No se pudo analizar la obra.";

/// A picked file could not be read or encoded.
pub const FILE_READ_FAILED: &str = "Error leyendo el archivo.";

/// A picked video exceeds the configured size cap.
pub const VIDEO_TOO_LARGE: &str = "El video es muy pesado. Máximo 20MB.";

/// The microphone could not be opened.
pub const MICROPHONE_UNAVAILABLE: &str = "No se pudo acceder al micrófono.";

/// Opening line of the chat panel.
pub const CHAT_GREETING: &str = "¡Hola! ¿Qué tal? Soy tu profe de filosofía. ¿Qué te anda dando vueltas por la cabeza hoy? Hablemos sin miedo.";

/// Chat provider answered with no text.
pub const CHAT_EMPTY_REPLY: &str = "Che, me quedé pensando y no sé qué decirte...";

/// In-character substitute when a chat turn fails.
pub const CHAT_FALLBACK_REPLY: &str = "Uhh, se me colgó el pensamiento. Probá de nuevo.";

/// Sharing failed for a reason other than the user cancelling.
pub const SHARE_FAILED: &str = "No se pudo compartir. Puedes descargar la imagen.";

/// No share mechanism is available on this platform.
pub const SHARE_UNAVAILABLE: &str = "Función compartir no disponible.";

/// The poster could not be written to disk.
pub const DOWNLOAD_FAILED: &str = "No se pudo guardar el póster.";
