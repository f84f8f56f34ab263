// api-factory/src/template.rs
use crate::data::Data;
use crate::encode::{encode_component, value_text};
use crate::method::Method;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// URL with `:name` placeholders, where a name is one or more of `[A-Za-z0-9_]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl UrlTemplate {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let bytes = source.as_bytes();
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b':' {
                let name_len = bytes[i + 1..].iter().take_while(|b| is_word(**b)).count();
                if name_len > 0 {
                    if literal_start < i {
                        segments.push(Segment::Literal(source[literal_start..i].to_string()));
                    }
                    let end = i + 1 + name_len;
                    segments.push(Segment::Placeholder(source[i + 1..end].to_string()));
                    literal_start = end;
                    i = end;
                    continue;
                }
            }
            i += 1;
        }

        if literal_start < bytes.len() {
            segments.push(Segment::Literal(source[literal_start..].to_string()));
        }

        Self { source, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance, repeats included
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute placeholders from `data`, removing each consumed field.
    ///
    /// Every occurrence takes its field afresh, so a repeated placeholder
    /// finds the field gone. A missing or undefined field renders as the
    /// empty string with a warning. Values are percent-encoded unless their
    /// name is in `raw`.
    pub fn render(&self, method: Method, data: &mut Data, raw: &HashSet<String>) -> String {
        let mut url = String::with_capacity(self.source.len());

        for segment in &self.segments {
            let name = match segment {
                Segment::Literal(text) => {
                    url.push_str(text);
                    continue;
                }
                Segment::Placeholder(name) => name,
            };

            let value = match data.take(name) {
                Some(value) => value_text(&value),
                None => {
                    let tag = format!(":{}", name);
                    warn!(method = %method, tag = %tag, "calling without placeholder value");
                    String::new()
                }
            };
            if raw.contains(name) {
                url.push_str(&value);
            } else {
                url.push_str(&encode_component(&value));
            }
        }

        url
    }
}

impl From<&str> for UrlTemplate {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl From<String> for UrlTemplate {
    fn from(source: String) -> Self {
        Self::parse(source)
    }
}
