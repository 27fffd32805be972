use super::{AttachmentContents, DataTransfer, TransferItem};

const PREVIEW_CHARS: usize = 100;

/// One human readable line per item, followed by a total, for debug logs.
pub fn describe_transfer(transfer: &DataTransfer) -> Vec<String> {
    let mut lines: Vec<String> = transfer
        .iter()
        .enumerate()
        .map(|(idx, (mime, item))| {
            let description = match item {
                TransferItem::File(file) => {
                    let origin = file
                        .uri
                        .as_ref()
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| "<no uri>".to_string());
                    match &file.contents {
                        AttachmentContents::Inline(data) => {
                            format!("[File] {}, {} ({} bytes)", file.name, origin, data.len())
                        }
                        AttachmentContents::AtOrigin => format!("[File] {}, {}", file.name, origin),
                    }
                }
                TransferItem::Text(text) => preview(text),
            };
            format!("[{}] {}: {}", idx + 1, mime, description)
        })
        .collect();

    lines.push(format!("Total {} items", transfer.len()));
    lines
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{} ... ({} bytes)", head, text.len())
}

#[cfg(test)]
mod tests {
    use super::super::FileAttachment;
    use super::*;

    #[test]
    fn describes_files_and_truncates_text() {
        let long = "x".repeat(150);
        let transfer = DataTransfer::new()
            .with_file("image/png", FileAttachment::inline("shot.png", vec![0u8; 4]))
            .with_text("text/plain", long);

        let lines = describe_transfer(&transfer);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[1] image/png: [File] shot.png, <no uri> (4 bytes)");
        assert!(lines[1].starts_with("[2] text/plain: xxxx"));
        assert!(lines[1].ends_with(" ... (150 bytes)"));
        assert_eq!(lines[2], "Total 2 items");
    }
}
