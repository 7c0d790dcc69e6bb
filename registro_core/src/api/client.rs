use super::crear;
use super::error::{self, Error};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// Client for the registration API
#[derive(Debug, Clone)]
pub struct Client {
    /// The server to connect to. Should only be the protocol and domain,
    /// e.g. `http://localhost:3118`.
    pub server: String,
}

/// The body the server sends with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResp {
    /// Machine-stable error code.
    error: String,

    /// Human-readable message, when the server includes one.
    message: Option<String>,
}

impl ErrorResp {
    /// The text to put in front of a person: the human message when present,
    /// the code otherwise.
    fn display(self) -> String {
        self.message.unwrap_or(self.error)
    }
}

impl Client {
    /// Construct a new client
    #[must_use]
    pub fn new(server: String) -> Self {
        Self { server }
    }

    /// Register a new user with the server.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`, plus `Http` if the photo's
    /// content type can't be encoded into the form.
    pub async fn crear(
        &self,
        http: &reqwest::Client,
        req: &crear::Req,
    ) -> error::Result<crear::Resp> {
        let url = Url::parse(&self.server)?.join(crear::PATH)?;

        Self::handle_response(http.post(url).multipart(req.to_form()?)).await
    }

    /// Convert an HTTP response into a result, interpreting errors in a
    /// standard way.
    ///
    /// ## Errors
    ///
    /// - `Ok(..)` if the server returned a success (2xx)
    /// - `Error::Api` if the server returned an error (4xx or 5xx), carrying
    ///   the message from the body — or "Error desconocido" when the body is
    ///   absent or malformed
    /// - `Error::Unexpected` if the server returned something else (the
    ///   server is not supposed to issue redirects or informational
    ///   responses.)
    async fn handle_response<T>(req: reqwest::RequestBuilder) -> error::Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = req.send().await?;

        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else if status.is_client_error() || status.is_server_error() {
            let message = match resp.json::<ErrorResp>().await {
                Ok(body) => body.display(),
                Err(_) => "Error desconocido".to_string(),
            };

            Err(Error::Api(message))
        } else {
            Err(Error::Unexpected(status))
        }
    }
}
