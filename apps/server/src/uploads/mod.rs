pub mod form;
pub mod storage;

pub use form::{read_bug_form, Attachment, BugForm};
pub use storage::{
    remove_screenshot, resolve_path, store_screenshot, validate_attachment, ALLOWED_EXTENSIONS,
    UPLOAD_URL_PREFIX,
};
