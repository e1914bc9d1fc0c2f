//! Content kinds and the codecs behind them.
//!
//! # Design
//! A call picks one `ContentKind` and uses it for both directions: the input
//! is encoded with it and the output is decoded with it. Dispatching on the
//! enum here keeps JSON/XML branching out of the executor.

use std::io::{BufReader, Read};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_XML: &str = "application/xml";

/// Body encoding used for a call's input and output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentKind {
    /// No body encoding. Calls with this kind carry no payloads.
    #[default]
    None,
    Json,
    Xml,
}

/// Errors raised while encoding or decoding a body.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("no content kind selected")]
    NoContentKind,

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::DeError),
}

impl ContentKind {
    /// The media type sent in `Content-Type` and `Accept`, if any.
    pub fn media_type(self) -> Option<&'static str> {
        match self {
            ContentKind::None => None,
            ContentKind::Json => Some(MEDIA_TYPE_JSON),
            ContentKind::Xml => Some(MEDIA_TYPE_XML),
        }
    }

    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            ContentKind::None => Err(CodecError::NoContentKind),
            ContentKind::Json => Ok(serde_json::to_vec(value)?),
            ContentKind::Xml => Ok(quick_xml::se::to_string(value)?.into_bytes()),
        }
    }

    pub fn decode<T: DeserializeOwned, R: Read>(self, reader: R) -> Result<T, CodecError> {
        match self {
            ContentKind::None => Err(CodecError::NoContentKind),
            ContentKind::Json => Ok(serde_json::from_reader(reader)?),
            ContentKind::Xml => Ok(quick_xml::de::from_reader(BufReader::new(reader))?),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    fn item() -> Item {
        Item {
            id: 7,
            name: "widget".to_string(),
        }
    }

    #[test]
    fn media_types() {
        assert_eq!(ContentKind::None.media_type(), None);
        assert_eq!(ContentKind::Json.media_type(), Some("application/json"));
        assert_eq!(ContentKind::Xml.media_type(), Some("application/xml"));
    }

    #[test]
    fn default_kind_is_none() {
        assert_eq!(ContentKind::default(), ContentKind::None);
    }

    #[test]
    fn json_encodes_fields() {
        let bytes = ContentKind::Json.encode(&item()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "widget");
    }

    #[test]
    fn xml_encodes_fields_as_elements() {
        let bytes = ContentKind::Xml.encode(&item()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<Item>"), "unexpected xml: {text}");
        assert!(text.contains("<id>7</id>"), "unexpected xml: {text}");
        assert!(text.contains("<name>widget</name>"), "unexpected xml: {text}");
    }

    #[test]
    fn xml_decodes_document() {
        let body: &[u8] = b"<Item><id>7</id><name>widget</name></Item>";
        let decoded: Item = ContentKind::Xml.decode(body).unwrap();
        assert_eq!(decoded, item());
    }

    #[test]
    fn json_decode_rejects_garbage() {
        let body: &[u8] = b"not json";
        let err = ContentKind::Json.decode::<Item, _>(body).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn xml_decode_rejects_missing_field() {
        let body: &[u8] = b"<Item><id>7</id></Item>";
        let err = ContentKind::Xml.decode::<Item, _>(body).unwrap_err();
        assert!(matches!(err, CodecError::Xml(_)));
    }

    #[test]
    fn none_kind_refuses_payloads() {
        assert!(matches!(
            ContentKind::None.encode(&item()),
            Err(CodecError::NoContentKind)
        ));
        let body: &[u8] = b"{}";
        assert!(matches!(
            ContentKind::None.decode::<Item, _>(body),
            Err(CodecError::NoContentKind)
        ));
    }
}
