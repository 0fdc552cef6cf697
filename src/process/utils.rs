use scraper::ElementRef;

/// Concatenated text of an element and its descendants, whitespace-trimmed.
pub fn cell_text(el: ElementRef<'_>) -> String {
    clean_str(&el.text().collect::<String>())
}

/// Trim surrounding Unicode whitespace (`str::trim` also covers the `\u{a0}`
/// padding some upstream cells carry).
pub fn clean_str(raw: &str) -> String {
    raw.trim().to_string()
}
