//! Property tests for screenshot path and attachment handling
//!
//! Stored paths must never resolve outside the upload directory and only
//! allow-listed extensions may pass validation.

use bugtrack::models::bug::parse_priority;
use bugtrack::uploads::{resolve_path, validate_attachment, ALLOWED_EXTENSIONS};
use proptest::prelude::*;
use std::path::Path;

proptest! {
    #[test]
    fn resolved_paths_stay_in_upload_dir(public in "\\PC{0,40}") {
        let base = Path::new("/srv/uploads");
        if let Some(path) = resolve_path(base, &public) {
            prop_assert_eq!(path.parent(), Some(base));
        }
    }

    #[test]
    fn traversal_is_never_resolved(name in "[a-z]{1,8}") {
        let base = Path::new("/srv/uploads");
        let traversal = format!("/uploads/../{}", name);
        prop_assert!(resolve_path(base, &traversal).is_none());
        let nested = format!("/uploads/{}/../../etc", name);
        prop_assert!(resolve_path(base, &nested).is_none());
    }

    #[test]
    fn only_allowed_extensions_validate(stem in "[a-z]{1,12}", ext in "[a-z]{1,5}") {
        let filename = format!("{}.{}", stem, ext);
        let accepted = validate_attachment(&filename, None).is_ok();
        prop_assert_eq!(accepted, ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    }

    #[test]
    fn priority_accepts_exactly_one_to_five(n in -20i32..20) {
        let raw = n.to_string();
        let parsed = parse_priority(Some(&raw));
        if (1..=5).contains(&n) {
            prop_assert_eq!(parsed.ok(), Some(n as i16));
        } else {
            prop_assert!(parsed.is_err());
        }
    }
}
