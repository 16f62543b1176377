//! Message content variants.
//!
//! Each variant validates its required fields before it is serialized into
//! a message payload. Optional string fields the server expects to be present
//! are sent as `""`, optional numbers as `0`.

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message content type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Image,
    Sound,
    Video,
    File,
    At,
    Location,
    Custom,
    System,
}

impl ContentType {
    /// Wire code of the content type.
    pub fn code(self) -> i32 {
        match self {
            ContentType::Text => 101,
            ContentType::Image => 102,
            ContentType::Sound => 103,
            ContentType::Video => 104,
            ContentType::File => 105,
            ContentType::At => 106,
            ContentType::Location => 109,
            ContentType::Custom => 110,
            ContentType::System => 1400,
        }
    }

    /// Content type for a wire code.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            101 => ContentType::Text,
            102 => ContentType::Image,
            103 => ContentType::Sound,
            104 => ContentType::Video,
            105 => ContentType::File,
            106 => ContentType::At,
            109 => ContentType::Location,
            110 => ContentType::Custom,
            1400 => ContentType::System,
            _ => return None,
        })
    }
}

impl Serialize for ContentType {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// Conversation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionType {
    Single,
    Group,
}

impl SessionType {
    /// Wire code of the session type.
    pub fn code(self) -> i32 {
        match self {
            SessionType::Single => 1,
            SessionType::Group => 2,
        }
    }
}

impl Serialize for SessionType {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// A typed message body.
pub trait MessageContent: Serialize {
    /// Content type sent alongside this body.
    const CONTENT_TYPE: ContentType;

    /// Check the required fields.
    fn validate(&self) -> Result<()>;

    /// Validate and serialize.
    fn to_value(&self) -> Result<Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SdkError::missing(field));
    }
    Ok(())
}

fn require_some<T>(value: &Option<T>, field: &str) -> Result<()> {
    if value.is_none() {
        return Err(SdkError::missing(field));
    }
    Ok(())
}

fn require_positive(value: i64, field: &str) -> Result<()> {
    if value <= 0 {
        return Err(SdkError::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

/// Plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextContent {
    pub content: String,
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl MessageContent for TextContent {
    const CONTENT_TYPE: ContentType = ContentType::Text;

    fn validate(&self) -> Result<()> {
        require(&self.content, "TextContent.content")
    }
}

/// One rendition of an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Picture {
    pub uuid: String,
    /// MIME type or extension, e.g. `image/png`.
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub url: String,
}

impl Picture {
    pub fn new(kind: impl Into<String>, width: u32, height: u32, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            width: Some(width),
            height: Some(height),
            url: url.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.kind, "Picture.type")?;
        require_some(&self.width, "Picture.width")?;
        require_some(&self.height, "Picture.height")?;
        require(&self.url, "Picture.url")
    }
}

/// An image in up to three renditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_picture: Option<Picture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_picture: Option<Picture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_picture: Option<Picture>,
}

impl ImageContent {
    /// Use the same picture for every rendition.
    pub fn from_picture(picture: Picture) -> Self {
        Self {
            source_path: None,
            source_picture: Some(picture.clone()),
            big_picture: Some(picture.clone()),
            snapshot_picture: Some(picture),
        }
    }
}

impl MessageContent for ImageContent {
    const CONTENT_TYPE: ContentType = ContentType::Image;

    fn validate(&self) -> Result<()> {
        let pictures = [
            &self.source_picture,
            &self.big_picture,
            &self.snapshot_picture,
        ];
        if pictures.iter().all(|p| p.is_none()) {
            return Err(SdkError::missing("ImageContent.sourcePicture"));
        }
        for picture in pictures.into_iter().flatten() {
            picture.validate()?;
        }
        Ok(())
    }
}

/// A voice clip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundContent {
    pub uuid: String,
    pub sound_path: String,
    pub source_url: String,
    pub data_size: u64,
    /// Seconds.
    pub duration: i64,
    pub sound_type: String,
}

impl SoundContent {
    pub fn new(source_url: impl Into<String>, duration: i64) -> Self {
        Self {
            source_url: source_url.into(),
            duration,
            ..Default::default()
        }
    }
}

impl MessageContent for SoundContent {
    const CONTENT_TYPE: ContentType = ContentType::Sound;

    fn validate(&self) -> Result<()> {
        require(&self.source_url, "SoundContent.sourceUrl")?;
        require_positive(self.duration, "SoundContent.duration")
    }
}

/// A video with its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    pub video_path: String,
    #[serde(rename = "videoUUID")]
    pub video_uuid: String,
    pub video_url: String,
    pub video_type: String,
    pub video_size: i64,
    /// Seconds.
    pub duration: i64,
    pub snapshot_path: String,
    #[serde(rename = "snapshotUUID")]
    pub snapshot_uuid: String,
    pub snapshot_size: u64,
    pub snapshot_url: String,
    pub snapshot_width: Option<u32>,
    pub snapshot_height: Option<u32>,
}

impl MessageContent for VideoContent {
    const CONTENT_TYPE: ContentType = ContentType::Video;

    fn validate(&self) -> Result<()> {
        require(&self.video_url, "VideoContent.videoUrl")?;
        require(&self.video_type, "VideoContent.videoType")?;
        require_positive(self.video_size, "VideoContent.videoSize")?;
        require_positive(self.duration, "VideoContent.duration")?;
        require(&self.snapshot_url, "VideoContent.snapshotUrl")?;
        require_some(&self.snapshot_width, "VideoContent.snapshotWidth")?;
        require_some(&self.snapshot_height, "VideoContent.snapshotHeight")
    }
}

/// A file attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub file_path: String,
    pub uuid: String,
    pub source_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
}

impl FileContent {
    pub fn new(
        source_url: impl Into<String>,
        file_name: impl Into<String>,
        file_size: i64,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            file_name: file_name.into(),
            file_size,
            ..Default::default()
        }
    }
}

impl MessageContent for FileContent {
    const CONTENT_TYPE: ContentType = ContentType::File;

    fn validate(&self) -> Result<()> {
        require(&self.source_url, "FileContent.sourceUrl")?;
        require(&self.file_name, "FileContent.fileName")?;
        require_positive(self.file_size, "FileContent.fileSize")
    }
}

/// A geographic location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LocationContent {
    pub description: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl LocationContent {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            description: String::new(),
            longitude: Some(longitude),
            latitude: Some(latitude),
        }
    }
}

impl MessageContent for LocationContent {
    const CONTENT_TYPE: ContentType = ContentType::Location;

    fn validate(&self) -> Result<()> {
        require_some(&self.longitude, "LocationContent.longitude")?;
        require_some(&self.latitude, "LocationContent.latitude")
    }
}

/// Application-defined content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomContent {
    /// Usually a JSON string.
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl CustomContent {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }
}

impl MessageContent for CustomContent {
    const CONTENT_TYPE: ContentType = ContentType::Custom;

    fn validate(&self) -> Result<()> {
        require(&self.data, "CustomContent.data")
    }
}

/// A group message mentioning members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtContent {
    pub text: String,
    pub at_user_list: Vec<String>,
    pub is_at_self: bool,
}

impl AtContent {
    pub fn new(text: impl Into<String>, at_user_list: Vec<String>) -> Self {
        Self {
            text: text.into(),
            at_user_list,
            is_at_self: false,
        }
    }
}

impl MessageContent for AtContent {
    const CONTENT_TYPE: ContentType = ContentType::At;

    fn validate(&self) -> Result<()> {
        require(&self.text, "AtContent.text")?;
        if self.at_user_list.is_empty() {
            return Err(SdkError::missing("AtContent.atUserList"));
        }
        Ok(())
    }
}

/// A system notification shown in a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemNotificationContent {
    pub notification_name: String,
    #[serde(rename = "notificationFaceURL")]
    pub notification_face_url: String,
    pub notification_type: Option<i32>,
    pub text: String,
    pub external_url: String,
    pub mix_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_elem: Option<ImageContent>,
}

impl MessageContent for SystemNotificationContent {
    const CONTENT_TYPE: ContentType = ContentType::System;

    fn validate(&self) -> Result<()> {
        require(&self.notification_name, "SystemNotificationContent.notificationName")?;
        require(
            &self.notification_face_url,
            "SystemNotificationContent.notificationFaceURL",
        )?;
        require_some(
            &self.notification_type,
            "SystemNotificationContent.notificationType",
        )?;
        require_some(&self.mix_type, "SystemNotificationContent.mixType")?;
        if let Some(picture) = &self.picture_elem {
            picture.validate()?;
        }
        Ok(())
    }
}
