//! Getting a finished image out of the app: save to disk or share.

pub mod download;
pub mod share;

pub use download::{download_filename, save_image};
pub use share::{
    share_result, share_url, ClipboardShare, ShareError, ShareRequest, ShareTarget,
    DEFAULT_SHARE_URL,
};
