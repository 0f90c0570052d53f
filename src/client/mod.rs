//! Bot API caller.
//!
//! [`Api`] ties the pieces together: it looks a method up in the registry,
//! encodes the arguments, hands the request to a [`Transport`] and decodes
//! the response with the method's declared return type.
//!
//! ```no_run
//! # #[cfg(feature = "http")]
//! # fn main() -> botwire::Result<()> {
//! use botwire::{Api, ClientConfig, HttpTransport};
//!
//! let config = ClientConfig::from_env()?;
//! let transport = HttpTransport::new(&config)?;
//! let api = Api::new(config, transport)?;
//!
//! let me = api.get_me()?;
//! println!("running as @{}", me.username.unwrap_or_default());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "http"))]
//! # fn main() {}
//! ```

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

use std::path::Path;

use botwire_value::Value;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::codec::{prune_nulls, rename_from_on_egress, value_to_json};
use crate::config::ClientConfig;
use crate::envelope::handle_response;
use crate::error::{Error, Result};
use crate::registry::{MethodDef, Registry};
use crate::types::{File, Message, Update, User};

/// Sends requests to the Bot API. Implementations return the raw response
/// body; the envelope is handled by the caller.
pub trait Transport {
    fn post_json(&self, url: &str, body: &str) -> Result<String>;

    fn post_multipart(&self, url: &str, form: MultipartForm) -> Result<String>;

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, url: &str, body: &str) -> Result<String> {
        (**self).post_json(url, body)
    }

    fn post_multipart(&self, url: &str, form: MultipartForm) -> Result<String> {
        (**self).post_multipart(url, form)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        (**self).get_bytes(url)
    }
}

/// Map a snake_case method name to the wire name: `send_message` becomes
/// `sendMessage`. Names without underscores are returned unchanged.
pub fn wire_method_name(name: &str) -> String {
    if !name.contains('_') {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for word in name.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

/// A file sent as multipart form data.
#[derive(Clone, PartialEq)]
pub struct InputFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl InputFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .field("mime", &self.mime)
            .finish()
    }
}

#[derive(Debug, Clone)]
enum Argument {
    Value(Value),
    Json(JsonValue),
    Upload(InputFile),
}

/// Named arguments for a method call.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name.into(), Argument::Value(value.into()))
    }

    /// Add the argument only when it is `Some`.
    pub fn opt(self, name: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.arg(name, value),
            None => self,
        }
    }

    /// A raw JSON argument, sent as given apart from the `from` rename.
    pub fn json(self, name: impl Into<String>, value: JsonValue) -> Self {
        self.push(name.into(), Argument::Json(value))
    }

    pub fn upload(self, name: impl Into<String>, file: InputFile) -> Self {
        self.push(name.into(), Argument::Upload(file))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Later values replace earlier ones with the same name.
    fn push(mut self, name: String, arg: Argument) -> Self {
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, arg));
        self
    }

    fn get(&self, name: &str) -> Option<&Argument> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, arg)| arg)
    }

    /// Check the arguments against `method` and encode them.
    ///
    /// Payload entries follow the declared parameter order. Uploads are
    /// split out and left out of the payload.
    pub fn encode(&self, registry: &Registry, method: &MethodDef) -> Result<EncodedCall> {
        if let Some((name, _)) = self.entries.iter().find(|(n, _)| method.param(n).is_none()) {
            return Err(Error::UnknownArgument {
                method: method.name.clone(),
                param: name.clone(),
            });
        }

        let mut payload = Map::new();
        let mut uploads = Vec::new();
        for param in &method.params {
            match self.get(&param.name) {
                Some(Argument::Value(value)) => {
                    payload.insert(param.name.clone(), value_to_json(registry, value)?);
                }
                Some(Argument::Json(json)) => {
                    payload.insert(param.name.clone(), json.clone());
                }
                Some(Argument::Upload(file)) => uploads.push((param.name.clone(), file.clone())),
                None if param.required => {
                    return Err(Error::MissingArgument {
                        method: method.name.clone(),
                        param: param.name.clone(),
                    })
                }
                None => {}
            }
        }

        let payload = match rename_from_on_egress(prune_nulls(JsonValue::Object(payload))) {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        Ok(EncodedCall { payload, uploads })
    }
}

/// Arguments after encoding.
#[derive(Debug, Clone)]
pub struct EncodedCall {
    pub payload: Map<String, JsonValue>,
    pub uploads: Vec<(String, InputFile)>,
}

impl EncodedCall {
    pub fn into_multipart(self) -> MultipartForm {
        let fields = self
            .payload
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect();
        MultipartForm {
            fields,
            files: self.uploads,
        }
    }
}

/// A multipart request: text fields plus files. Non-string values are
/// carried as their JSON text.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, InputFile)>,
}

pub struct Api<'r, T> {
    config: ClientConfig,
    registry: &'r Registry,
    transport: T,
}

impl<T: Transport> Api<'static, T> {
    /// A caller for the embedded Bot API registry.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self> {
        Ok(Self::with_registry(config, Registry::bot_api()?, transport))
    }
}

impl<'r, T: Transport> Api<'r, T> {
    pub fn with_registry(config: ClientConfig, registry: &'r Registry, transport: T) -> Self {
        Self {
            config,
            registry,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_url, self.config.token, method)
    }

    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.config.api_url,
            self.config.token,
            file_path.trim_start_matches('/')
        )
    }

    /// Call a method by its wire or snake_case name.
    ///
    /// Returns `None` when the result is absent for the declared return type.
    pub fn call(&self, method: &str, args: Arguments) -> Result<Option<Value>> {
        let def = self.registry.method(&wire_method_name(method))?;
        let encoded = args.encode(self.registry, def)?;
        let url = self.method_url(&def.name);

        debug!(method = %def.name, uploads = encoded.uploads.len(), "calling Bot API");
        let body = if encoded.uploads.is_empty() {
            let text = serde_json::to_string(&encoded.payload)?;
            trace!(method = %def.name, bytes = text.len(), "JSON payload");
            self.transport.post_json(&url, &text)?
        } else {
            self.transport.post_multipart(&url, encoded.into_multipart())?
        };
        trace!(method = %def.name, bytes = body.len(), "response body");

        handle_response(self.registry, &body, &def.returns)
    }

    /// [`call`](Self::call) and convert the result to a native view.
    pub fn call_for<R>(&self, method: &str, args: Arguments) -> Result<R>
    where
        R: TryFrom<Value, Error = botwire_value::ConversionError>,
    {
        let value = self.call(method, args)?.ok_or_else(|| Error::MissingResult {
            method: wire_method_name(method),
        })?;
        Ok(R::try_from(value)?)
    }

    pub fn get_me(&self) -> Result<User> {
        self.call_for("getMe", Arguments::new())
    }

    pub fn get_updates(&self, offset: Option<i64>, timeout: Option<i64>) -> Result<Vec<Update>> {
        let args = Arguments::new()
            .opt("offset", offset)
            .opt("timeout", timeout);
        self.call_for("getUpdates", args)
    }

    pub fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        let args = Arguments::new().arg("chat_id", chat_id).arg("text", text);
        self.call_for("sendMessage", args)
    }

    pub fn get_file(&self, file_id: &str) -> Result<File> {
        self.call_for("getFile", Arguments::new().arg("file_id", file_id))
    }

    /// Download a file by the `file_path` returned from `getFile`.
    pub fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        debug!(file_path, "downloading file");
        self.transport.get_bytes(&self.file_url(file_path))
    }
}
