//! Utility functions for user interaction and common operations.

use crate::cache::Thumbnail;

/// Format the deletion confirmation message with the affected source files
pub fn format_deletion_message(thumbnails: &[Thumbnail]) -> String {
    let mut message = format!("About to delete {} thumbnail(s) for:\n", thumbnails.len());
    for thumb in thumbnails.iter().take(5) {
        message.push_str(&format!("  {}\n", thumb.source.display()));
    }
    if thumbnails.len() > 5 {
        message.push_str(&format!("  ... and {} more\n", thumbnails.len() - 5));
    }
    message.push_str("Continue?");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn thumbnails(n: usize) -> Vec<Thumbnail> {
        (0..n)
            .map(|i| Thumbnail {
                thumbnail: PathBuf::from(format!("/cache/{i}.png")),
                source: PathBuf::from(format!("/photos/{i}.jpg")),
            })
            .collect()
    }

    #[test]
    fn short_lists_are_printed_in_full() {
        let message = format_deletion_message(&thumbnails(2));
        assert!(message.starts_with("About to delete 2 thumbnail(s) for:"));
        assert!(message.contains("/photos/1.jpg"));
        assert!(!message.contains("more"));
        assert!(message.ends_with("Continue?"));
    }

    #[test]
    fn long_lists_are_truncated() {
        let message = format_deletion_message(&thumbnails(8));
        assert!(message.contains("/photos/4.jpg"));
        assert!(!message.contains("/photos/5.jpg"));
        assert!(message.contains("... and 3 more"));
    }
}
