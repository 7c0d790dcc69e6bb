use thiserror::Error;

/// How many characters a DNI has.
pub const DNI_CHARS: usize = 8;

/// Largest accepted photo, in bytes.
pub const MAX_FOTO_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted for the photo.
pub const FOTO_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Why an upload was turned away at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The photo was not declared as a PNG or JPEG.
    #[error("Solo se permiten imágenes PNG, JPEG o JPG")]
    UnsupportedMediaType,

    /// The photo was over [`MAX_FOTO_BYTES`].
    #[error("La foto no puede superar los 10 MB")]
    PayloadTooLarge,
}

/// Check that a DNI has exactly [`DNI_CHARS`] characters once surrounding
/// whitespace is trimmed. Characters are Unicode scalar values, not bytes.
#[must_use]
pub fn dni_length_ok(dni: &str) -> bool {
    dni.trim().chars().count() == DNI_CHARS
}

/// Gate an uploaded photo on its declared content type and size.
///
/// This runs before any business logic sees the bytes and is independent of
/// the HTTP framework: the server calls it at the multipart boundary.
///
/// ## Errors
///
/// - `UnsupportedMediaType` if the content type is not in
///   [`FOTO_CONTENT_TYPES`]
/// - `PayloadTooLarge` if the photo is over [`MAX_FOTO_BYTES`]
pub fn validate_upload(content_type: &str, size_bytes: usize) -> Result<(), UploadError> {
    if !FOTO_CONTENT_TYPES.contains(&content_type) {
        return Err(UploadError::UnsupportedMediaType);
    }

    if size_bytes > MAX_FOTO_BYTES {
        return Err(UploadError::PayloadTooLarge);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dni_of_eight_chars_is_ok() {
        assert!(dni_length_ok("12345678"));
    }

    #[test]
    fn dni_is_trimmed_before_counting() {
        assert!(dni_length_ok("  12345678  "));
    }

    #[test]
    fn short_and_long_dnis_fail() {
        assert!(!dni_length_ok("1234567"));
        assert!(!dni_length_ok("123456789"));
        assert!(!dni_length_ok(""));
    }

    #[test]
    fn characters_are_counted_not_bytes() {
        // eight characters, more than eight bytes
        assert!(dni_length_ok("áéíóúñü1"));
    }

    #[test]
    fn png_within_limit_passes() {
        assert_eq!(validate_upload("image/png", 1024), Ok(()));
    }

    #[test]
    fn pdf_is_unsupported() {
        assert_eq!(
            validate_upload("application/pdf", 1024),
            Err(UploadError::UnsupportedMediaType)
        );
    }

    #[test]
    fn oversized_photo_is_rejected() {
        assert_eq!(
            validate_upload("image/jpeg", MAX_FOTO_BYTES + 1),
            Err(UploadError::PayloadTooLarge)
        );
    }

    #[test]
    fn the_limit_itself_is_allowed() {
        assert_eq!(validate_upload("image/jpeg", MAX_FOTO_BYTES), Ok(()));
    }

    proptest! {
        #[test]
        fn any_eight_character_dni_passes(dni in "[0-9A-Za-z]{8}") {
            prop_assert!(dni_length_ok(&dni));
        }

        #[test]
        fn any_other_length_fails(dni in "[0-9]{0,20}") {
            prop_assume!(dni.len() != DNI_CHARS);
            prop_assert!(!dni_length_ok(&dni));
        }
    }
}
