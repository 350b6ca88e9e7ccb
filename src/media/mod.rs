//! Media codec utility.
//!
//! Turns user-supplied files and recorded audio into [`MediaPayload`]s: a
//! base64 transport string plus its media-type tag and display name, ready
//! to be embedded as inline parts in a provider request.
//!
//! # Example
//!
//! ```rust
//! use cinema_socrates::media::MediaPayload;
//!
//! let payload = MediaPayload::from_bytes(b"hola", "text/plain", "nota.txt");
//! assert_eq!(payload.data, "aG9sYQ==");
//! assert_eq!(payload.decode().unwrap(), b"hola");
//! ```

pub mod codec;
pub mod input;

pub use codec::{encode, mime_for_path, strip_data_url_header, MediaError, MediaPayload};
pub use input::{load_input, LoadedInput, DEFAULT_MAX_VIDEO_BYTES};
