const ROW: usize = 16;

/// Render `buf` as classic hex dump rows
///
/// `0000: 41 42 ...                                        |AB              |`
pub fn hex_dump(buf: &[u8]) -> Vec<String> {
    buf.chunks(ROW)
        .enumerate()
        .map(|(row, chunk)| {
            let mut line = format!("{:04x}:", row * ROW);
            for byte in chunk {
                line.push(' ');
                line.push_str(&hex::encode([*byte]));
            }
            line.push_str(&"   ".repeat(ROW - chunk.len()));
            line.push_str(" |");
            line.extend(chunk.iter().map(|b| printable(*b)));
            line.push_str(&" ".repeat(ROW - chunk.len()));
            line.push('|');
            line
        })
        .collect()
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_row_is_padded() {
        let rows = hex_dump(b"OK\r\n> ");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            format!("0000: 4f 4b 0d 0a 3e 20{} |OK..> {}|", "   ".repeat(10), " ".repeat(10))
        );
    }

    #[test]
    fn test_offsets_advance_by_row() {
        let data: Vec<u8> = (0u8..40).collect();
        let rows = hex_dump(&data);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("0000: 00 01 02"));
        assert!(rows[1].starts_with("0010: 10 11 12"));
        assert!(rows[2].starts_with("0020: 20 21 22"));
        assert!(rows[1].ends_with("|................|"));
    }

    #[test]
    fn test_empty_input() {
        assert!(hex_dump(&[]).is_empty());
    }
}
