use crate::models::Entry;
use std::collections::HashMap;

pub const BACKGROUND_OPEN: &str = "[BACKGROUND]\n";
pub const BACKGROUND_CLOSE: &str = "\n[/BACKGROUND]";
pub const TRUNCATION_MARKER: &str = "[TRUNCATED] ";

pub const LABEL_OVERHEAD: usize = BACKGROUND_OPEN.len() + BACKGROUND_CLOSE.len();
pub const MARKER_LEN: usize = TRUNCATION_MARKER.len();

const PART_SEPARATOR: &str = "\n\n";

#[derive(Debug, Default)]
pub struct HierarchyCache {
    bodies: HashMap<String, String>,
}

impl HierarchyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn resolve(&mut self, title: &str, entries: &[Entry]) -> Option<&str> {
        if !self.bodies.contains_key(title) {
            let found = entries.iter().find(|entry| entry.title() == title)?;
            self.bodies
                .insert(title.to_string(), found.content.trim().to_string());
        }
        self.bodies.get(title).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Background {
    body: String,
    truncated: bool,
}

impl Background {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fit(text: &str, max_inner: usize) -> Self {
        if text.is_empty() {
            return Self::empty();
        }
        if text.chars().count() <= max_inner {
            return Self {
                body: text.to_string(),
                truncated: false,
            };
        }
        match max_inner.checked_sub(MARKER_LEN) {
            Some(keep) if keep > 0 => truncate_front(text, keep),
            _ => Self::empty(),
        }
    }

    pub fn shrink_to(&self, max_rendered: usize) -> Self {
        if self.is_empty() || self.len() <= max_rendered {
            return self.clone();
        }
        match max_rendered.checked_sub(LABEL_OVERHEAD + MARKER_LEN) {
            Some(keep) if keep > 0 => truncate_front(&self.body, keep),
            _ => Self::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && !self.truncated
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let marker = if self.truncated { MARKER_LEN } else { 0 };
        LABEL_OVERHEAD + marker + self.body.chars().count()
    }

    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let marker = if self.truncated { TRUNCATION_MARKER } else { "" };
        format!("{BACKGROUND_OPEN}{marker}{}{BACKGROUND_CLOSE}", self.body)
    }
}

fn truncate_front(text: &str, keep: usize) -> Background {
    Background {
        body: tail_chars(text, keep).to_string(),
        truncated: true,
    }
}

fn tail_chars(text: &str, keep: usize) -> &str {
    let total = text.chars().count();
    if keep >= total {
        return text;
    }
    match text.char_indices().nth(total - keep) {
        Some((offset, _)) => &text[offset..],
        None => "",
    }
}

pub fn build_background(
    hierarchy: &[String],
    entries: &[Entry],
    cache: &mut HierarchyCache,
    max_background_size: usize,
) -> Background {
    let mut parts: Vec<String> = Vec::with_capacity(hierarchy.len());
    for title in hierarchy {
        if let Some(body) = cache.resolve(title, entries) {
            if !body.is_empty() {
                parts.push(body.to_string());
            }
        }
    }

    Background::fit(&parts.join(PART_SEPARATOR), max_background_size)
}
