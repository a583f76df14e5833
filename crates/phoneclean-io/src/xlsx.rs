use crate::error::{IoError, Result};
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";

// Matched on local names so prefixed (`x:row`) and plain documents both parse.
const TAG_RELATIONSHIP: &[u8] = b"Relationship";
const TAG_SHEET: &[u8] = b"sheet";
const TAG_SHARED_STRING_ITEM: &[u8] = b"si";
const TAG_PHONETIC_TEXT: &[u8] = b"rPh";
const TAG_TEXT: &[u8] = b"t";
const TAG_ROW: &[u8] = b"row";
const TAG_CELL: &[u8] = b"c";
const TAG_INLINE_STRING: &[u8] = b"is";
const TAG_VALUE: &[u8] = b"v";

type XmlReader<'a, R> = Reader<BufReader<ZipFile<'a, R>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

impl CellKind {
    fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") | Some("str") => CellKind::InlineString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            _ => CellKind::Number,
        }
    }

    fn render(self, raw: String, shared: &[String]) -> Option<String> {
        match self {
            CellKind::SharedString => raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared.get(index))
                .cloned(),
            CellKind::Boolean => Some(if raw.trim() == "1" { "TRUE" } else { "FALSE" }.to_string()),
            CellKind::Error => None,
            CellKind::Number | CellKind::InlineString => Some(raw),
        }
    }
}

/// Reads the first worksheet into dense rows of raw cell text, starting at the
/// first row that has a value. Missing cells are empty strings.
pub(crate) fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))?;
    let sheet_path = first_sheet_path(&mut zip)?;
    let shared = load_shared_strings(&mut zip)?;
    let reader = xml_reader(&mut zip, &sheet_path)?
        .ok_or_else(|| IoError::InvalidWorkbook(format!("missing {sheet_path}")))?;
    let cells = read_cells(reader, &shared)?;
    Ok(into_grid(cells))
}

fn xml_reader<'a, R: Read + Seek>(
    zip: &'a mut ZipArchive<R>,
    name: &str,
) -> Result<Option<XmlReader<'a, R>>> {
    match zip.by_name(name) {
        Ok(file) => {
            let mut reader = Reader::from_reader(BufReader::new(file));
            let config = reader.config_mut();
            config.check_end_names = false;
            config.expand_empty_elements = true;
            config.trim_text(false);
            Ok(Some(reader))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn is_tag(name: QName<'_>, tag: &[u8]) -> bool {
    name.local_name().as_ref() == tag
}

fn attribute(event: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match event.try_get_attribute(name)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn load_relationships<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<HashMap<String, String>> {
    let mut relationships = HashMap::new();
    let Some(mut reader) = xml_reader(zip, WORKBOOK_RELS)? else {
        return Ok(relationships);
    };
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(event) if is_tag(event.name(), TAG_RELATIONSHIP) => {
                let id = attribute(&event, "Id")?;
                let target = attribute(&event, "Target")?;
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id, to_zip_path(&target));
                }
            }
            _ => {}
        }
    }
    Ok(relationships)
}

fn to_zip_path(target: &str) -> String {
    let target = target.replace('\\', "/");
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn first_sheet_path<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<String> {
    let relationships = load_relationships(zip)?;
    let mut reader = xml_reader(zip, WORKBOOK)?
        .ok_or_else(|| IoError::InvalidWorkbook(format!("missing {WORKBOOK}")))?;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(event) if is_tag(event.name(), TAG_SHEET) => {
                for entry in event.attributes() {
                    let entry = entry?;
                    if entry.key.local_name().as_ref() != b"id" {
                        continue;
                    }
                    let id = entry.unescape_value()?;
                    if let Some(path) = relationships.get(id.as_ref()) {
                        return Ok(path.clone());
                    }
                }
            }
            _ => {}
        }
    }
    Err(IoError::InvalidWorkbook("workbook has no worksheets".to_string()))
}

fn load_shared_strings<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let mut strings = Vec::new();
    let Some(mut reader) = xml_reader(zip, SHARED_STRINGS)? else {
        return Ok(strings);
    };
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(event) if is_tag(event.name(), TAG_SHARED_STRING_ITEM) => {
                strings.push(read_text(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
            }
            _ => {}
        }
    }
    Ok(strings)
}

// Collects text up to the closing `end` tag. Phonetic runs are skipped.
fn read_text<B: BufRead>(reader: &mut Reader<B>, end: &[u8], in_text: bool) -> Result<String> {
    let mut text = String::new();
    let mut in_text = in_text;
    let mut phonetic = false;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::End(event) if is_tag(event.name(), end) => break,
            Event::Start(event) if is_tag(event.name(), TAG_PHONETIC_TEXT) => phonetic = true,
            Event::End(event) if is_tag(event.name(), TAG_PHONETIC_TEXT) => phonetic = false,
            Event::Start(event) if !phonetic && is_tag(event.name(), TAG_TEXT) => in_text = true,
            Event::End(event) if is_tag(event.name(), TAG_TEXT) => in_text = false,
            Event::Text(event) if in_text => text.push_str(&event.xml_content()?),
            Event::CData(event) if in_text => text.push_str(&event.xml_content()?),
            Event::GeneralRef(event) if in_text => push_reference(&mut text, &event.xml_content()?),
            _ => {}
        }
    }
    Ok(text)
}

fn push_reference(text: &mut String, reference: &str) {
    let resolved = match reference.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => number.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32).map(String::from)
        }
        None => resolve_xml_entity(reference).map(str::to_string),
    };
    if let Some(resolved) = resolved {
        text.push_str(&resolved);
    }
}

fn read_cells<B: BufRead>(mut reader: Reader<B>, shared: &[String]) -> Result<Vec<(usize, usize, String)>> {
    let mut cells = Vec::new();
    let mut row_index = 0usize;
    let mut col_index = 0usize;
    let mut position = (0usize, 0usize);
    let mut kind = CellKind::Number;
    let mut value: Option<String> = None;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(event) if is_tag(event.name(), TAG_ROW) => {
                if let Some(row) = attribute(&event, "r")?.and_then(|r| r.trim().parse::<usize>().ok()) {
                    row_index = row.saturating_sub(1);
                }
                col_index = 0;
            }
            Event::End(event) if is_tag(event.name(), TAG_ROW) => row_index += 1,
            Event::Start(event) if is_tag(event.name(), TAG_CELL) => {
                position = attribute(&event, "r")?
                    .as_deref()
                    .and_then(cell_position)
                    .unwrap_or((row_index, col_index));
                col_index = position.1 + 1;
                kind = CellKind::from_type(attribute(&event, "t")?.as_deref());
                value = None;
            }
            Event::Start(event) if is_tag(event.name(), TAG_VALUE) => {
                value = Some(read_text(&mut reader, TAG_VALUE, true)?);
            }
            Event::Start(event) if is_tag(event.name(), TAG_INLINE_STRING) => {
                value = Some(read_text(&mut reader, TAG_INLINE_STRING, false)?);
            }
            Event::End(event) if is_tag(event.name(), TAG_CELL) => {
                if let Some(text) = value.take().and_then(|raw| kind.render(raw, shared)) {
                    cells.push((position.0, position.1, text));
                }
            }
            _ => {}
        }
    }
    Ok(cells)
}

/// Zero-based `(row, column)` of an A1-style reference.
fn cell_position(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let mut column = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        column = column * 26 + usize::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
    }
    let row: usize = digits.parse().ok()?;
    Some((row.checked_sub(1)?, column - 1))
}

fn into_grid(cells: Vec<(usize, usize, String)>) -> Vec<Vec<String>> {
    let Some(first_row) = cells.iter().map(|(row, _, _)| *row).min() else {
        return Vec::new();
    };
    let last_row = cells.iter().map(|(row, _, _)| *row).max().unwrap_or(first_row);
    let width = cells.iter().map(|(_, col, _)| col + 1).max().unwrap_or(0);
    let mut grid = vec![vec![String::new(); width]; last_row - first_row + 1];
    for (row, col, text) in cells {
        grid[row - first_row][col] = text;
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::{cell_position, read_first_sheet};
    use crate::error::IoError;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Leads" sheetId="1" r:id="rId1"/><sheet name="Other" sheetId="2" r:id="rId2"/></sheets>
</workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

    const SHARED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<si><t>Name</t></si><si><t>Mobile</t></si><si><r><t>Gr</t></r><r><t>ace</t></r><rPh><t>x</t></rPh></si>
</sst>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="2"><c r="A2" t="s"><v>0</v></c><c r="B2" t="s"><v>1</v></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>Ada &amp; Co</t></is></c><c r="B3"><v>9876543210</v></c></row>
<row r="4"><c r="A4" t="s"><v>2</v></c><c r="C4" t="b"><v>1</v></c><c r="D4" t="e"><v>#N/A</v></c></row>
</sheetData></worksheet>"#;

    fn workbook(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in parts {
            zip.start_file(*name, options).expect("start file");
            zip.write_all(body.as_bytes()).expect("write part");
        }
        zip.finish().expect("finish").into_inner()
    }

    #[test]
    fn reads_first_sheet_with_shared_and_inline_strings() {
        let bytes = workbook(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET),
            ("xl/worksheets/sheet2.xml", "<worksheet/>"),
        ]);
        let rows = read_first_sheet(&bytes).expect("read");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Name", "Mobile", ""]);
        assert_eq!(rows[1], vec!["Ada & Co", "9876543210", ""]);
        assert_eq!(rows[2], vec!["Grace", "", "TRUE"]);
    }

    #[test]
    fn rejects_archives_without_workbook() {
        let bytes = workbook(&[("docProps/app.xml", "<Properties/>")]);
        let err = read_first_sheet(&bytes).unwrap_err();
        assert!(matches!(err, IoError::InvalidWorkbook(_)));
    }

    #[test]
    fn rejects_bytes_that_are_not_a_zip() {
        let err = read_first_sheet(b"Name,Mobile\n").unwrap_err();
        assert!(matches!(err, IoError::Zip(_)));
    }

    #[test]
    fn cell_position_parses_a1_references() {
        assert_eq!(cell_position("A1"), Some((0, 0)));
        assert_eq!(cell_position("b3"), Some((2, 1)));
        assert_eq!(cell_position("AA10"), Some((9, 26)));
        assert_eq!(cell_position("12"), None);
        assert_eq!(cell_position("A0"), None);
    }
}
