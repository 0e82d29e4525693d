//! `application/x-www-form-urlencoded` submission codec.
//!
//! # Responsibilities
//! - Split a raw body into `key=value` pairs
//! - Apply plus and percent decoding to each component
//! - Reject the whole body on the first malformed pair
//!
//! # Design Decisions
//! - Components are decoded after splitting, so an encoded `&` or `=` inside
//!   a value never changes the pair structure
//! - Decoding is strict: invalid UTF-8 after percent decoding is an error,
//!   not a lossy replacement

use std::borrow::Cow;
use std::collections::BTreeMap;

use percent_encoding::percent_decode;

/// Why a body could not be decoded into a [`Submission`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A pair has no `=` separator (this includes empty pairs).
    #[error("pair {index} has no '=' separator: {pair:?}")]
    MissingSeparator { index: usize, pair: String },

    /// A key or value is not valid UTF-8 once decoded.
    #[error("pair {index} is not valid UTF-8 after decoding")]
    InvalidUtf8 { index: usize },
}

/// One decoded form submission, pairs in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pairs: Vec<(String, String)>,
}

impl Submission {
    /// Decode a raw url-encoded body.
    pub fn decode(body: &[u8]) -> Result<Self, FormError> {
        let mut pairs = Vec::new();

        for (index, raw) in body.split(|b| *b == b'&').enumerate() {
            let separator = raw.iter().position(|b| *b == b'=').ok_or_else(|| {
                FormError::MissingSeparator {
                    index,
                    pair: String::from_utf8_lossy(raw).into_owned(),
                }
            })?;

            let key = decode_component(&raw[..separator])
                .ok_or(FormError::InvalidUtf8 { index })?;
            let value = decode_component(&raw[separator + 1..])
                .ok_or(FormError::InvalidUtf8 { index })?;

            pairs.push((key, value));
        }

        Ok(Self { pairs })
    }

    /// Build a submission from already-decoded pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Pairs exactly as they appeared in the body.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Field mapping; a repeated key keeps its last value.
    pub fn fields(&self) -> BTreeMap<String, String> {
        self.pairs.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode back into an url-encoded body.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

fn decode_component(raw: &[u8]) -> Option<String> {
    let unplussed: Cow<'_, [u8]> = if raw.contains(&b'+') {
        Cow::Owned(raw.iter().map(|&b| if b == b'+' { b' ' } else { b }).collect())
    } else {
        Cow::Borrowed(raw)
    };

    percent_decode(&unplussed)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
