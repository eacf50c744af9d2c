//! Minimal single-page PDF 1.4 writer.
//!
//! Supports positioned text in the two standard Helvetica faces and
//! horizontal rules, which is all the invoice layout needs.

use std::fmt::Write as _;

/// A4 portrait in points.
pub const PAGE_WIDTH: u32 = 595;
pub const PAGE_HEIGHT: u32 = 842;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font { Regular, Bold }

impl Font {
    fn resource(self) -> &'static str {
        match self { Self::Regular => "F1", Self::Bold => "F2" }
    }
}

/// Content of one page, built up as drawing operations.
#[derive(Debug, Default)]
pub struct Page { ops: String }

impl Page {
    pub fn new() -> Self { Self::default() }

    pub fn text(&mut self, font: Font, size: u32, x: u32, y: u32, text: &str) -> &mut Self {
        let _ = writeln!(self.ops, "BT /{} {size} Tf {x} {y} Td ({}) Tj ET", font.resource(), escape(text));
        self
    }

    pub fn rule(&mut self, x1: u32, x2: u32, y: u32) -> &mut Self {
        let _ = writeln!(self.ops, "0.5 w {x1} {y} m {x2} {y} l S");
        self
    }

    /// Serialize the page into a complete PDF file.
    pub fn finish(&self) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>".to_string(),
            format!("<< /Length {} >>\nstream\n{}endstream", self.ops.len(), self.ops),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", index + 1);
        }
        let xref_at = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = write!(out, "{offset:010} 00000 n \n");
        }
        let _ = write!(out, "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n", objects.len() + 1);
        out.into_bytes()
    }
}

/// Escape a PDF literal string. Characters WinAnsiEncoding can show are
/// written as octal escapes so the output stays ASCII and the xref offsets
/// stay exact. Anything else becomes `?`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => { out.push('\\'); out.push(c); }
            ' '..='~' => out.push(c),
            _ => match win_ansi(c) {
                Some(code) => { let _ = write!(out, "\\{code:03o}"); }
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsiEncoding code for a non-ASCII character.
fn win_ansi(c: char) -> Option<u8> {
    let code = match c {
        '\u{a0}'..='\u{ff}' => return u8::try_from(u32::from(c)).ok(),
        '€' => 0x80, '‚' => 0x82, 'ƒ' => 0x83, '„' => 0x84, '…' => 0x85, '†' => 0x86, '‡' => 0x87,
        'ˆ' => 0x88, '‰' => 0x89, 'Š' => 0x8a, '‹' => 0x8b, 'Œ' => 0x8c, 'Ž' => 0x8e,
        '\u{2018}' => 0x91, '\u{2019}' => 0x92, '\u{201c}' => 0x93, '\u{201d}' => 0x94, '•' => 0x95,
        '\u{2013}' => 0x96, '\u{2014}' => 0x97, '˜' => 0x98, '™' => 0x99, 'š' => 0x9a, '›' => 0x9b,
        'œ' => 0x9c, 'ž' => 0x9e, 'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code)
}
