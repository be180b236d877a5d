//! Hex literal rendering for C byte arrays

/// Indentation in front of every body line
const INDENT: &str = " ";

/// Width of one `0xNN` literal plus its `,` separator
const ITEM_WIDTH: usize = 5;

/// Render a byte as a C hex literal (`0x00` .. `0xff`)
pub fn hex_literal(byte: u8) -> String {
    format!("0x{:02x}", byte)
}

/// Number of literals that fit on one body line
pub fn items_per_line(line_width: usize) -> usize {
    (line_width.saturating_sub(INDENT.len()) / ITEM_WIDTH).max(1)
}

/// Render the body of a byte array initializer
///
/// Each line is indented by one space and holds up to
/// [`items_per_line`] literals. Every line except the last ends with a
/// comma; no trailing newline is added.
pub fn render_hex_body(bytes: &[u8], line_width: usize) -> String {
    let per_line = items_per_line(line_width);
    let line_count = bytes.len().div_ceil(per_line);
    let mut body = String::with_capacity(bytes.len() * ITEM_WIDTH + line_count * 2);

    for (line_index, chunk) in bytes.chunks(per_line).enumerate() {
        if line_index > 0 {
            body.push('\n');
        }
        body.push_str(INDENT);
        for (i, byte) in chunk.iter().enumerate() {
            if i > 0 {
                body.push(',');
            }
            body.push_str(&hex_literal(*byte));
        }
        if line_index + 1 < line_count {
            body.push(',');
        }
    }

    body
}
