//! Message model: typed content variants and the send payload.

pub mod content;
pub mod payload;

pub use content::{
    AtContent, ContentType, CustomContent, FileContent, ImageContent, LocationContent,
    MessageContent, Picture, SessionType, SoundContent, SystemNotificationContent, TextContent,
    VideoContent,
};
pub use payload::{MessagePayload, SendOptions};
