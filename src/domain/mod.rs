//! Core types: NotePath, Note, Tags, attachment naming

mod attachment;
mod note;
mod path;
mod tags;

pub use attachment::{
    Attachment, AttachmentMeta, AttachmentName, ContentDigest, DigestError, FilenameError,
    is_stored_path, stored_path,
};
pub use note::{Note, TextError, UNTITLED, derive_title, prepare_text};
pub use path::{ATTACHMENTS_ROOT, NotePath, NotePathError};
pub use tags::{TAGS_KEYWORD, Tags, extract_tags};
