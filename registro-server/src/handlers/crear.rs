use crate::conn::Conn;
use crate::error::Error;
use crate::store;
use axum::extract::multipart::Multipart;
use axum::{http::StatusCode, Json};
use registro_core::validate;
use serde::Serialize;

/// Confirmation that the user was stored.
#[derive(Debug, Serialize)]
pub struct Resp {
    message: String,
}

/// The parts we expect out of one multipart submission.
#[derive(Debug, Default)]
struct Submission {
    /// The `nombre` text part. Empty if absent.
    nombre: String,

    /// The `dni` text part. Empty if absent.
    dni: String,

    /// The `foto` file part, if one was sent.
    foto: Option<Foto>,
}

/// Metadata and contents of the `foto` part.
#[derive(Debug)]
struct Foto {
    /// Declared content type, if the client sent one.
    content_type: Option<String>,

    /// The raw image bytes.
    data: Vec<u8>,
}

impl Foto {
    /// Content type and size, for the request log.
    fn metadata(&self) -> (Option<&str>, usize) {
        (self.content_type.as_deref(), self.data.len())
    }
}

impl Submission {
    /// The presence and length checks, in order. Returns the trimmed text
    /// fields and the photo on success.
    fn validate(&self) -> Result<(&str, &str, &Foto), Error> {
        let nombre = self.nombre.trim();
        let dni = self.dni.trim();
        let foto = self.foto.as_ref().filter(|foto| !foto.data.is_empty());

        let Some(foto) = foto else {
            tracing::warn!("validation failed: photo absent or empty");
            return Err(Error::MissingFields);
        };

        if nombre.is_empty() || dni.is_empty() {
            tracing::warn!(
                nombre = !nombre.is_empty(),
                dni = !dni.is_empty(),
                "validation failed: missing fields"
            );
            return Err(Error::MissingFields);
        }

        if !validate::dni_length_ok(dni) {
            tracing::warn!(dni, "dni length validation failed");
            return Err(Error::DniLength);
        }

        Ok((nombre, dni, foto))
    }
}

/// Pull the three expected parts out of the multipart stream. Unknown parts
/// are skipped. The upload gate runs the moment the photo's metadata and
/// bytes are available, before anything else can look at them.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, Error> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("nombre") => submission.nombre = field.text().await?,
            Some("dni") => submission.dni = field.text().await?,
            Some("foto") => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await?.to_vec();

                validate::validate_upload(content_type.as_deref().unwrap_or(""), data.len())?;

                submission.foto = Some(Foto { content_type, data });
            }
            _ => continue,
        }
    }

    Ok(submission)
}

#[tracing::instrument(skip(conn, multipart))]
pub async fn handler(
    Conn(mut conn): Conn,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Resp>), Error> {
    let submission = read_submission(multipart).await?;

    tracing::info!(
        nombre = !submission.nombre.trim().is_empty(),
        dni = !submission.dni.trim().is_empty(),
        foto = ?submission.foto.as_ref().map(Foto::metadata),
        "received request"
    );

    let (nombre, dni, foto) = submission.validate()?;

    store::insert_user(&mut conn, nombre, dni, &foto.data).await?;

    Ok((
        StatusCode::CREATED,
        Json(Resp {
            message: "Usuario creado".to_string(),
        }),
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handlers::test::multipart;
    use registro_core::validate::{UploadError, MAX_FOTO_BYTES};
    use sqlx::{PgPool, Row};

    /// A few bytes that are enough to stand in for a PNG.
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

    /// Parse and validate a hand-built submission, returning the first error.
    async fn submit(
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> Result<Submission, Error> {
        let submission = read_submission(multipart(fields, file).await).await?;
        submission.validate()?;
        Ok(submission)
    }

    #[test_log::test(tokio::test)]
    async fn accepts_a_complete_submission() {
        let submission = submit(
            &[("nombre", "Juan Perez"), ("dni", "12345678")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap();

        let (nombre, dni, foto) = submission.validate().unwrap();

        assert_eq!(nombre, "Juan Perez");
        assert_eq!(dni, "12345678");
        assert_eq!(foto.data, PNG);
    }

    #[test_log::test(tokio::test)]
    async fn trims_surrounding_whitespace() {
        let submission = submit(
            &[("nombre", "  Juan Perez  "), ("dni", " 12345678 ")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap();

        let (nombre, dni, _) = submission.validate().unwrap();

        assert_eq!(nombre, "Juan Perez");
        assert_eq!(dni, "12345678");
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_missing_name() {
        let err = submit(
            &[("dni", "12345678")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::MissingFields);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_blank_name() {
        let err = submit(
            &[("nombre", "   "), ("dni", "12345678")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::MissingFields);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_missing_photo() {
        let err = submit(&[("nombre", "Juan Perez"), ("dni", "12345678")], None)
            .await
            .unwrap_err();

        assert_eq!(err, Error::MissingFields);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_an_empty_photo_file() {
        let err = submit(
            &[("nombre", "Juan Perez"), ("dni", "12345678")],
            Some(("foto", "foto.png", "image/png", &[])),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::MissingFields);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_short_dni() {
        let err = submit(
            &[("nombre", "Juan Perez"), ("dni", "1234567")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::DniLength);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_long_dni() {
        let err = submit(
            &[("nombre", "Juan Perez"), ("dni", "123456789")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::DniLength);
    }

    #[test_log::test(tokio::test)]
    async fn rejects_a_pdf_at_the_upload_boundary() {
        // the other fields are fine; the photo's type alone sinks it
        let err = submit(
            &[("nombre", "Juan Perez"), ("dni", "12345678")],
            Some(("foto", "cv.pdf", "application/pdf", PNG)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::Upload(UploadError::UnsupportedMediaType));
    }

    #[test_log::test(tokio::test)]
    async fn rejects_an_oversized_photo() {
        let big = vec![0u8; MAX_FOTO_BYTES + 1];

        let err = submit(
            &[("nombre", "Juan Perez"), ("dni", "12345678")],
            Some(("foto", "foto.jpg", "image/jpeg", big.as_slice())),
        )
        .await
        .unwrap_err();

        assert_eq!(err, Error::Upload(UploadError::PayloadTooLarge));
    }

    #[test_log::test(tokio::test)]
    async fn skips_parts_it_does_not_know() {
        let submission = submit(
            &[
                ("nombre", "Juan Perez"),
                ("extra", "ignorame"),
                ("dni", "12345678"),
            ],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await
        .unwrap();

        assert!(submission.validate().is_ok());
    }

    #[test_log::test(sqlx::test)]
    #[ignore = "needs a running Postgres (set DATABASE_URL)"]
    async fn creates_a_user(pool: PgPool) {
        let conn = pool.acquire().await.unwrap();
        let multipart = multipart(
            &[("nombre", "Juan Perez"), ("dni", "12345678")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await;

        let (status, Json(resp)) = handler(Conn(conn), multipart).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.message, "Usuario creado");

        let row = sqlx::query("SELECT nombre, foto FROM users WHERE dni = $1")
            .bind("12345678")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(row.get::<String, _>("nombre"), "Juan Perez");
        // binary round-trip: exactly the bytes that were submitted
        assert_eq!(row.get::<Vec<u8>, _>("foto"), PNG);
    }

    #[test_log::test(sqlx::test)]
    #[ignore = "needs a running Postgres (set DATABASE_URL)"]
    async fn rejects_a_duplicate_dni(pool: PgPool) {
        let conn = pool.acquire().await.unwrap();
        let first = multipart(
            &[("nombre", "Juan Perez"), ("dni", "12345678")],
            Some(("foto", "foto.png", "image/png", PNG)),
        )
        .await;

        handler(Conn(conn), first).await.unwrap();

        let conn = pool.acquire().await.unwrap();
        let second = multipart(
            &[("nombre", "Otra Persona"), ("dni", "12345678")],
            Some(("foto", "otra.jpg", "image/jpeg", PNG)),
        )
        .await;

        let err = handler(Conn(conn), second).await.unwrap_err();

        assert_eq!(err, Error::DuplicateDni);

        let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE dni = $1")
            .bind("12345678")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(row.get::<i64, _>("n"), 1);
    }
}
