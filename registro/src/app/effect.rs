use super::Action;
use registro_core::api::{self, crear, Client};
use std::path::Path;
use tokio::{fs, io};

/// Connections to external services that effects use. We keep these around
/// to have some level of connection sharing for the app as a whole.
pub struct EffectContext {
    /// an HTTP client with reqwest
    http: reqwest::Client,
}

impl EffectContext {
    /// Get a new `EffectContext`
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug)]
pub enum Effect {
    /// Send a submission to the server
    Submit {
        /// Trimmed name
        nombre: String,

        /// Trimmed DNI
        dni: String,

        /// Where the photo lives on disk
        foto_path: String,
    },
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the
    /// next `Action` the application needs to handle
    pub async fn run(self, ctx: &EffectContext, client: &Client) -> Option<Action> {
        match self.run_inner(ctx, client).await {
            Ok(action) => action,
            Err(problem) => {
                tracing::error!(?problem, "problem running effect");
                Some(Action::Problem(problem.to_string()))
            }
        }
    }

    /// The actual implementation of `run`, but with a `Result` wrapper to
    /// make it more ergonomic to write.
    async fn run_inner(
        self,
        ctx: &EffectContext,
        client: &Client,
    ) -> Result<Option<Action>, Problem> {
        match self {
            Self::Submit {
                nombre,
                dni,
                foto_path,
            } => {
                tracing::info!(%foto_path, "submitting registration");

                let bytes = fs::read(&foto_path).await?;

                let filename = Path::new(&foto_path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "foto".to_string());

                let req = crear::Req {
                    nombre,
                    dni,
                    foto: crear::Foto {
                        content_type: content_type_for(&filename).to_string(),
                        filename,
                        bytes,
                    },
                };

                let resp = client.crear(&ctx.http, &req).await?;

                Ok(Some(Action::Registered(resp)))
            }
        }
    }
}

/// Declare a content type from the file's extension, the way a browser
/// would. Anything unrecognized goes up as a generic byte stream and gets
/// turned away by the server, which owns that rule.
fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Problems that can happen while running an `Effect`.
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    /// We couldn't read the photo from disk.
    #[error("No se pudo leer la foto: {0}")]
    Io(#[from] io::Error),

    /// We had a problem talking to the server: either the request never got
    /// there, or it answered with an error.
    #[error("{0}")]
    Api(#[from] api::Error),
}
