use serde::{Deserialize, Serialize};

/// Where the create-user endpoint lives.
pub const PATH: &str = "/api/usuarios";

/// A submission to register a new user.
#[derive(Debug, Clone)]
pub struct Req {
    /// Full name, as entered in the form.
    pub nombre: String,

    /// The 8-character national ID.
    pub dni: String,

    /// The selected photo.
    pub foto: Foto,
}

/// The photo part of a submission.
#[derive(Debug, Clone)]
pub struct Foto {
    /// Name the file had on the client.
    pub filename: String,

    /// Declared content type (e.g. `image/png`).
    pub content_type: String,

    /// The raw image bytes.
    pub bytes: Vec<u8>,
}

impl Req {
    /// Encode this submission as a multipart form with parts `nombre`,
    /// `dni`, and `foto`.
    ///
    /// ## Errors
    ///
    /// Fails if the photo's content type is not parseable as a MIME type.
    pub fn to_form(&self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let foto = reqwest::multipart::Part::bytes(self.foto.bytes.clone())
            .file_name(self.foto.filename.clone())
            .mime_str(&self.foto.content_type)?;

        Ok(reqwest::multipart::Form::new()
            .text("nombre", self.nombre.clone())
            .text("dni", self.dni.clone())
            .part("foto", foto))
    }
}

/// Confirmation that the user was stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct Resp {
    /// Human-readable confirmation, e.g. "Usuario creado".
    pub message: String,
}
