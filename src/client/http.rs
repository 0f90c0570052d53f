//! Blocking HTTP transport on `reqwest`.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Proxy;

use super::{MultipartForm, Transport};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// One request per call, no retries. Bot API errors come back as response
/// bodies with `ok: false`, so HTTP status codes are not checked for method
/// calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy).map_err(transport_error)?);
        }
        Ok(Self {
            client: builder.build().map_err(transport_error)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

// The request URL carries the bot token, so it is stripped from errors.
fn transport_error(err: reqwest::Error) -> Error {
    Error::Transport(Box::new(err.without_url()))
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<String> {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .and_then(|resp| resp.text())
            .map_err(transport_error)
    }

    fn post_multipart(&self, url: &str, form: MultipartForm) -> Result<String> {
        let mut multipart = Form::new();
        for (name, value) in form.fields {
            multipart = multipart.text(name, value);
        }
        for (name, file) in form.files {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime).map_err(transport_error)?;
            }
            multipart = multipart.part(name, part);
        }

        self.client
            .post(url)
            .multipart(multipart)
            .send()
            .and_then(|resp| resp.text())
            .map_err(transport_error)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map(|bytes| bytes.to_vec())
            .map_err(transport_error)
    }
}
