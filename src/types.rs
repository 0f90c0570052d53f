//! Native views of the most used Bot API records.
//!
//! Every other record stays a dynamic [`Record`](botwire_value::Record).
//! Fields these views do not name are dropped on conversion.

use botwire_value::{ConversionError, RecordReader, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl TryFrom<Value> for User {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "User")?;
        Ok(User {
            id: r.required("id")?,
            is_bot: r.required("is_bot")?,
            first_name: r.required("first_name")?,
            last_name: r.optional("last_name")?,
            username: r.optional("username")?,
            language_code: r.optional("language_code")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`.
    pub kind: String,
    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TryFrom<Value> for Chat {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "Chat")?;
        Ok(Chat {
            id: r.required("id")?,
            kind: r.required("type")?,
            title: r.optional("title")?,
            username: r.optional("username")?,
            first_name: r.optional("first_name")?,
            last_name: r.optional("last_name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageEntity {
    pub kind: String,
    pub offset: i64,
    pub length: i64,
    pub url: Option<String>,
    pub user: Option<User>,
}

impl TryFrom<Value> for MessageEntity {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "MessageEntity")?;
        Ok(MessageEntity {
            kind: r.required("type")?,
            offset: r.required("offset")?,
            length: r.required("length")?,
            url: r.optional("url")?,
            user: r.optional("user")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    pub file_size: Option<i64>,
}

impl TryFrom<Value> for PhotoSize {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "PhotoSize")?;
        Ok(PhotoSize {
            file_id: r.required("file_id")?,
            width: r.required("width")?,
            height: r.required("height")?,
            file_size: r.optional("file_size")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file_id: String,
    pub thumb: Option<PhotoSize>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

impl TryFrom<Value> for Document {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "Document")?;
        Ok(Document {
            file_id: r.required("file_id")?,
            thumb: r.optional("thumb")?,
            file_name: r.optional("file_name")?,
            mime_type: r.optional("mime_type")?,
            file_size: r.optional("file_size")?,
        })
    }
}

/// A file ready to be downloaded with `Api::download_file`.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub file_id: String,
    pub file_size: Option<i64>,
    pub file_path: Option<String>,
}

impl TryFrom<Value> for File {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "File")?;
        Ok(File {
            file_id: r.required("file_id")?,
            file_size: r.optional("file_size")?,
            file_path: r.optional("file_path")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub reply_to_message: Option<Box<Message>>,
    pub text: Option<String>,
    pub entities: Vec<MessageEntity>,
    pub caption: Option<String>,
    pub photo: Vec<PhotoSize>,
    pub document: Option<Document>,
}

impl TryFrom<Value> for Message {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "Message")?;
        Ok(Message {
            message_id: r.required("message_id")?,
            date: r.required("date")?,
            chat: r.required("chat")?,
            from: r.optional("from_")?,
            reply_to_message: r.optional::<Message>("reply_to_message")?.map(Box::new),
            text: r.optional("text")?,
            entities: r.optional("entities")?.unwrap_or_default(),
            caption: r.optional("caption")?,
            photo: r.optional("photo")?.unwrap_or_default(),
            document: r.optional("document")?,
        })
    }
}

/// An incoming update. Kinds without a native view are left out; decode the
/// update as a dynamic record to reach them.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
    pub channel_post: Option<Message>,
    pub edited_channel_post: Option<Message>,
}

impl TryFrom<Value> for Update {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "Update")?;
        Ok(Update {
            update_id: r.required("update_id")?,
            message: r.optional("message")?,
            edited_message: r.optional("edited_message")?,
            channel_post: r.optional("channel_post")?,
            edited_channel_post: r.optional("edited_channel_post")?,
        })
    }
}

/// Extra information attached to some failed requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// The group moved to a supergroup with this id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds to wait before the request can be repeated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<i64>,
}

impl TryFrom<Value> for ResponseParameters {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut r = RecordReader::new(value, "ResponseParameters")?;
        Ok(ResponseParameters {
            migrate_to_chat_id: r.optional("migrate_to_chat_id")?,
            retry_after: r.optional("retry_after")?,
        })
    }
}
