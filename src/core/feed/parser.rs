use std::borrow::Cow;

use super::types::FeedItem;

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("feed payload is not valid utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("xml feed parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("feed has no channel element")]
    MissingChannel,
}

/// Parses an RSS document into its channel items, in document order.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<Vec<FeedItem>, FeedParseError> {
    let trimmed = trim_leading_ascii_whitespace(raw);
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    let text = decode_payload(trimmed)?;
    let doc = roxmltree::Document::parse(&text)?;

    let channel = doc
        .root_element()
        .children()
        .find(|node| node.has_tag_name("channel"))
        .ok_or(FeedParseError::MissingChannel)?;

    let items = channel
        .children()
        .filter(|node| node.has_tag_name("item"))
        .filter_map(item_from_node)
        .collect();

    Ok(items)
}

/// Decodes the HTML entities that survive XML unescaping.
///
/// Issue titles arrive escaped twice, so `&amp;quot;` in the document is
/// `&quot;` after parsing and `"` after this pass. Each reference is decoded
/// on its own: unknown entities and bare ampersands are kept as written.
pub fn decode_title(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let tail = &rest[start..];
        match reference_len(tail) {
            Some(len) => {
                let reference = &tail[..len];
                match quick_xml::escape::unescape(reference) {
                    Ok(text) => decoded.push_str(&text),
                    Err(_) => decoded.push_str(reference),
                }
                rest = &tail[len..];
            }
            None => {
                decoded.push('&');
                rest = &tail[1..];
            }
        }
    }
    decoded.push_str(rest);

    Cow::Owned(decoded)
}

/// Length of the `&name;` reference at the start of `tail`, if there is one.
fn reference_len(tail: &str) -> Option<usize> {
    let body = &tail[1..];
    let end = body.find(|c: char| c == ';' || c == '&' || c.is_whitespace())?;
    body[end..].starts_with(';').then_some(end + 2)
}

/// Feeds that are not UTF-8 are transcoded from the encoding their XML
/// declaration names.
fn decode_payload(raw: &[u8]) -> Result<Cow<'_, str>, FeedParseError> {
    match std::str::from_utf8(raw) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(error) => {
            let encoding = declared_encoding(raw)
                .filter(|encoding| *encoding != encoding_rs::UTF_8)
                .ok_or(FeedParseError::Encoding(error))?;
            let (text, _, _) = encoding.decode(raw);
            Ok(text)
        }
    }
}

fn declared_encoding(raw: &[u8]) -> Option<&'static encoding_rs::Encoding> {
    let prolog_end = raw.windows(2).position(|window| window == b"?>")?;
    let prolog = std::str::from_utf8(&raw[..prolog_end]).ok()?;
    if !prolog.starts_with("<?xml") {
        return None;
    }
    let after = &prolog[prolog.find("encoding")? + "encoding".len()..];
    let value = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = value[1..].split(quote).next()?;
    encoding_rs::Encoding::for_label(label.as_bytes())
}

fn item_from_node(node: roxmltree::Node<'_, '_>) -> Option<FeedItem> {
    let title_node = node.children().find(|child| child.has_tag_name("title"))?;
    let raw: String = title_node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let title = decode_title(raw.trim()).into_owned();

    Some(FeedItem { title })
}

fn trim_leading_ascii_whitespace(raw: &[u8]) -> &[u8] {
    let mut index = 0;
    while index < raw.len() && raw[index].is_ascii_whitespace() {
        index += 1;
    }
    &raw[index..]
}
