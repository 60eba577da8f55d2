//! Entity adaptation and message content translation.
//!
//! Everything here is a short, stateless transformation from a client payload
//! into a host-side shape. The event bridge and the bot facade both funnel
//! through these functions, so the two directions stay symmetric.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use braze_core::{
    Channel, Element, Guild, Message, SUBTYPE_GROUP, SUBTYPE_PRIVATE, User, private_channel_id,
    render,
};
use braze_puppet::{
    ContactPayload, FileBox, MessagePayload, MessageType, Puppet, PuppetResult, RoomPayload,
};

/// Converts a contact payload into a universal user.
///
/// The display name fills both `username` and `nickname`. The avatar is
/// fetched through the puppet and resolved per [`resolve_file_box`]; any
/// failure along that path silently yields `avatar: None`.
pub async fn adapt_contact(puppet: &dyn Puppet, payload: &ContactPayload) -> User {
    let avatar = match puppet.contact_avatar(&payload.id).await {
        Ok(Some(file)) => match resolve_file_box(&file).await {
            Ok((url, _)) => Some(url),
            Err(error) => {
                debug!(contact_id = %payload.id, %error, "avatar not resolvable");
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            debug!(contact_id = %payload.id, %error, "avatar not available");
            None
        }
    };
    User {
        user_id: payload.id.clone(),
        username: Some(payload.name.clone()),
        nickname: Some(payload.name.clone()),
        avatar,
        is_bot: None,
    }
}

/// Fetches and adapts the contact behind `contact_id`.
///
/// A missing payload yields a bare user carrying only the id; transport
/// errors propagate.
pub async fn lookup_user(puppet: &dyn Puppet, contact_id: &str) -> PuppetResult<User> {
    match puppet.contact_payload(contact_id).await? {
        Some(contact) => Ok(adapt_contact(puppet, &contact).await),
        None => Ok(User::new(contact_id)),
    }
}

/// Converts a room payload into the guild/channel pair the host expects.
///
/// A room is one channel inside a guild of the same id; the topic (a separate
/// client call) fills both names. Topic failures propagate to the caller.
pub async fn adapt_room(puppet: &dyn Puppet, payload: &RoomPayload) -> PuppetResult<(Guild, Channel)> {
    let topic = puppet.room_topic(&payload.id).await?;
    let guild = Guild {
        guild_id: payload.id.clone(),
        guild_name: Some(topic.clone()),
    };
    let channel = Channel {
        channel_id: payload.id.clone(),
        channel_name: Some(topic),
    };
    Ok((guild, channel))
}

/// Converts a message payload into a universal message.
///
/// Returns `None` when the content translation yields nothing (unsupported
/// type or internal failure); a recalled message survives with empty
/// elements. The channel id follows the `"private:"` convention: the author's
/// id for one-to-one messages, the bare room id for group messages.
pub async fn adapt_message(puppet: &dyn Puppet, payload: &MessagePayload) -> Option<Message> {
    let elements = message_to_elements(puppet, payload).await?;
    let author = match puppet.contact_payload(&payload.talker_id).await {
        Ok(Some(contact)) => adapt_contact(puppet, &contact).await,
        _ => User::new(payload.talker_id.as_str()),
    };
    let (channel_id, guild_id, subtype) = match &payload.room_id {
        Some(room_id) => (room_id.clone(), Some(room_id.clone()), SUBTYPE_GROUP),
        None => (private_channel_id(&payload.talker_id), None, SUBTYPE_PRIVATE),
    };
    let content = render(&elements);
    Some(Message {
        message_id: payload.id.clone(),
        user_id: payload.talker_id.clone(),
        author,
        channel_id,
        guild_id,
        subtype: subtype.to_string(),
        elements,
        content,
        timestamp: payload.timestamp_ms,
    })
}

/// Translates a message payload into its content elements.
///
/// `Some(vec![])` marks a recalled message. `None` marks a message this
/// adapter cannot represent (unsupported type, missing attachment, or any
/// translation failure); callers drop such messages without dispatching.
pub async fn message_to_elements(
    puppet: &dyn Puppet,
    payload: &MessagePayload,
) -> Option<Vec<Element>> {
    match translate_content(puppet, payload).await {
        Ok(elements) => elements,
        Err(error) => {
            warn!(message_id = %payload.id, %error, "dropping untranslatable message");
            None
        }
    }
}

async fn translate_content(
    puppet: &dyn Puppet,
    payload: &MessagePayload,
) -> PuppetResult<Option<Vec<Element>>> {
    if payload.message_type == MessageType::Recalled {
        return Ok(Some(Vec::new()));
    }

    // Mention elements come first, in the order the client reports them.
    // Stripping relies on the display name appearing verbatim as `@name `
    // in the text; a reformatted or colliding name leaves the literal
    // `@name` text behind.
    let mut text = payload.text.clone().unwrap_or_default();
    let mut elements = Vec::new();
    for contact_id in &payload.mention_ids {
        match puppet.contact_payload(contact_id).await? {
            Some(contact) => {
                let tag = format!("@{} ", contact.name);
                text = text.replacen(&tag, "", 1);
                elements.push(Element::mention_named(contact_id.as_str(), contact.name));
            }
            None => elements.push(Element::mention(contact_id.as_str())),
        }
    }

    match payload.message_type {
        MessageType::Text => elements.push(Element::text(text)),
        MessageType::Image | MessageType::Audio | MessageType::Video => {
            let Some(file) = puppet.message_file(&payload.id).await? else {
                return Ok(None);
            };
            let (url, _) = resolve_file_box(&file).await?;
            let name = Some(auto_filename(&url));
            elements.push(match payload.message_type {
                MessageType::Image => Element::image(url, name),
                MessageType::Audio => Element::audio(url, name),
                _ => Element::video(url, name),
            });
        }
        MessageType::Attachment => {
            let Some(file) = puppet.message_file(&payload.id).await? else {
                return Ok(None);
            };
            let (url, declared) = resolve_file_box(&file).await?;
            let name = declared.unwrap_or_else(|| auto_filename(&url));
            elements.push(Element::file(url, Some(name)));
        }
        MessageType::Url => {
            let Some(link) = puppet.message_url(&payload.id).await? else {
                return Ok(None);
            };
            elements.push(Element::Link {
                href: link.url,
                title: link.title,
                description: link.description,
                thumbnail: link.thumbnail_url,
            });
        }
        MessageType::Contact => {
            let Some(contact_id) = puppet.message_contact(&payload.id).await? else {
                return Ok(None);
            };
            let Some(contact) = puppet.contact_payload(&contact_id).await? else {
                return Ok(None);
            };
            elements.push(Element::contact_card(contact_id, contact.name));
        }
        _ => return Ok(None),
    }

    Ok(Some(elements))
}

/// Resolves a file box to a URL the host can carry.
///
/// Remote URLs pass through unchanged; every byte-backed variant is
/// re-encoded as a base64 data URL. Returns the URL together with the box's
/// declared filename.
pub async fn resolve_file_box(file: &FileBox) -> PuppetResult<(String, Option<String>)> {
    let name = file.name().map(str::to_string);
    let url = match file.remote_url() {
        Some(url) => url.to_string(),
        None => file.to_data_url().await?,
    };
    Ok((url, name))
}

/// Builds the outgoing file box for an element URL.
///
/// Data URLs are unpacked back into their base64 backing so a puppet never
/// has to fetch them; everything else stays a remote URL.
pub fn file_box_for_url(url: &str, name: Option<&str>) -> FileBox {
    let file = match url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((_, payload)) => FileBox::from_base64(payload),
        None => FileBox::from_url(url),
    };
    match name {
        Some(name) => file.with_name(name),
        None => file,
    }
}

/// Best-effort filename for an attachment URL. Never fails.
///
/// `file://` URLs and plain URLs yield the path's base name (query and
/// fragment stripped); base64 data URLs get an extension sniffed from the
/// decoded magic bytes, `file.bin` when the bytes are unrecognized.
pub fn auto_filename(url: &str) -> String {
    if let Some(path) = url.strip_prefix("file://") {
        return base_name(path);
    }
    if let Some(rest) = url.strip_prefix("data:") {
        let bytes = rest
            .split_once(";base64,")
            .and_then(|(_, payload)| STANDARD.decode(payload).ok())
            .unwrap_or_default();
        let ext = sniff_extension(&bytes).unwrap_or("bin");
        return format!("file.{ext}");
    }
    base_name(url)
}

fn base_name(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = &path[..end];
    let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if name.is_empty() {
        "file.bin".to_string()
    } else {
        name.to_string()
    }
}

/// Maps well-known magic-byte prefixes to a file extension.
fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("gif");
    }
    if bytes.starts_with(b"RIFF") && bytes.len() >= 12 {
        if &bytes[8..12] == b"WEBP" {
            return Some("webp");
        }
        if &bytes[8..12] == b"WAVE" {
            return Some("wav");
        }
        return None;
    }
    if bytes.starts_with(b"BM") {
        return Some("bmp");
    }
    if bytes.starts_with(b"ID3")
        || bytes.starts_with(&[0xFF, 0xFB])
        || bytes.starts_with(&[0xFF, 0xF3])
        || bytes.starts_with(&[0xFF, 0xF2])
    {
        return Some("mp3");
    }
    if bytes.starts_with(b"OggS") {
        return Some("ogg");
    }
    if bytes.starts_with(b"fLaC") {
        return Some("flac");
    }
    if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
        return Some("mp4");
    }
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("webm");
    }
    if bytes.starts_with(b"%PDF") {
        return Some("pdf");
    }
    if bytes.starts_with(b"PK\x03\x04") {
        return Some("zip");
    }
    None
}
