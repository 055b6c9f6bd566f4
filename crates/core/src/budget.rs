use crate::background::Background;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    pub background: Background,
    pub available_chars: usize,
    pub oversized: bool,
}

pub fn allocate(
    chunk_size: usize,
    min_content_size: usize,
    background: Background,
    title: &str,
) -> Budget {
    let mut background = background;

    if chunk_size.saturating_sub(background.len()) < min_content_size && !background.is_empty() {
        warn!(
            entry = title,
            background_size = background.len(),
            "background too large, reducing it to fit the minimum content size"
        );
        background = match chunk_size.checked_sub(min_content_size) {
            Some(max_background) if max_background > 0 => background.shrink_to(max_background),
            _ => Background::empty(),
        };
    }

    let remaining = chunk_size.saturating_sub(background.len());
    let oversized = remaining < min_content_size;
    if oversized {
        warn!(
            entry = title,
            chunk_size,
            min_content_size,
            background_size = background.len(),
            "chunk size cannot honor the content floor, chunks will exceed the target"
        );
    }

    Budget {
        background,
        available_chars: remaining.max(min_content_size),
        oversized,
    }
}
