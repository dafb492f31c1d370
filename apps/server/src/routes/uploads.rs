use actix_files::Files;
use actix_web::web;
use std::path::{Path, PathBuf};

use crate::uploads::UPLOAD_URL_PREFIX;

/// Serves stored screenshots under `/uploads/<file>`.
/// Directory listings are disabled; unknown files return 404.
pub fn configure(dir: &Path) -> impl FnOnce(&mut web::ServiceConfig) {
    let dir: PathBuf = dir.to_path_buf();
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(Files::new(UPLOAD_URL_PREFIX, dir).prefer_utf8(true));
    }
}
