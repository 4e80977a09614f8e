//! PPTX file parser implementation.

use docket_core::{Error, Presentation, Result, Shape, Slide};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Magic bytes of a ZIP container (PK\x03\x04).
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Check whether a file header looks like a PPTX (ZIP) container.
pub fn is_pptx_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZIP_MAGIC)
}

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader into slides of shape trees.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("{}: {} slides", filename, slide_order.len());

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Get the ordered list of slide paths.
    ///
    /// Uses the `sldIdLst` order from presentation.xml, falling back to the
    /// numbering of the slide relationships when that part is missing.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let relationships = parse_slide_relationships(&rels_content)?;

        if relationships.is_empty() {
            return Err(Error::CorruptedFile(
                "presentation has no slide relationships".to_string(),
            ));
        }

        let listed = match self.read_file_from_archive(archive, PRESENTATION_PATH) {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                log::warn!("Falling back to relationship order: {}", e);
                Vec::new()
            }
        };

        let by_id: HashMap<&str, &str> = relationships
            .iter()
            .map(|rel| (rel.id.as_str(), rel.target.as_str()))
            .collect();

        let ordered: Vec<String> = listed
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .map(|target| resolve_target(target))
            .collect();

        if !ordered.is_empty() {
            return Ok(ordered);
        }

        let mut slides: Vec<(String, Option<usize>)> = relationships
            .iter()
            .map(|rel| {
                let order_num = extract_slide_number(&rel.target).or_else(|| extract_slide_number(&rel.id));
                (resolve_target(&rel.target), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = Slide::new(slide_number);

        for shape in extract_shape_tree(&content)? {
            slide.add_shape(shape);
        }

        Ok(slide)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A slide relationship from presentation.xml.rels.
#[derive(Debug)]
struct SlideRelationship {
    id: String,
    target: String,
}

/// Collect the slide relationships (not layouts or masters).
fn parse_slide_relationships(xml: &str) -> Result<Vec<SlideRelationship>> {
    let mut relationships = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Relationship" => {
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                if rel_type.ends_with("/slide") {
                    relationships.push(SlideRelationship {
                        id: attribute(e, b"Id").unwrap_or_default(),
                        target: attribute(e, b"Target").unwrap_or_default(),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldId" => {
                if let Some(id) = relationship_id(e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Text frame state for the `p:sp` currently being read.
#[derive(Debug, Default)]
struct TextShapeState {
    has_text_body: bool,
    in_text_body: bool,
    in_run_text: bool,
    paragraphs: usize,
    text: String,
}

impl TextShapeState {
    fn start_paragraph(&mut self) {
        if self.paragraphs > 0 {
            self.text.push('\n');
        }
        self.paragraphs += 1;
    }

    fn finish(self) -> Shape {
        if self.has_text_body {
            Shape::Text(self.text)
        } else {
            Shape::Other
        }
    }
}

/// Build the shape tree of a slide from its XML.
///
/// Group shapes (`grpSp`) become [`Shape::Group`] with children in
/// document order, `sp` elements with a text body become [`Shape::Text`]
/// (paragraphs and line breaks as `\n`), and pictures, connectors, graphic
/// frames and text-less shapes become [`Shape::Other`]. Anything inside
/// `mc:AlternateContent` is left out, since its choice and fallback
/// branches repeat the same content.
fn extract_shape_tree(xml_content: &str) -> Result<Vec<Shape>> {
    let mut reader = Reader::from_str(xml_content);
    // Run boundaries can carry significant spaces.
    reader.trim_text(false);

    // Open containers: the slide's shape tree, then one level per group.
    let mut stack: Vec<Vec<Shape>> = vec![Vec::new()];
    let mut current: Option<TextShapeState> = None;
    // Depth inside pictures, connectors and graphic frames.
    let mut opaque_depth = 0usize;
    // Depth inside markup-compatibility blocks, which are skipped outright.
    let mut skipped_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    tag if skipped_depth > 0 => {
                        if tag == ALTERNATE_CONTENT {
                            skipped_depth += 1;
                        }
                    }
                    ALTERNATE_CONTENT => skipped_depth = 1,
                    _ if opaque_depth > 0 => {
                        if is_opaque_shape(local_name(name.as_ref())) {
                            opaque_depth += 1;
                        }
                    }
                    b"grpSp" => stack.push(Vec::new()),
                    b"sp" => current = Some(TextShapeState::default()),
                    tag if is_opaque_shape(tag) => opaque_depth = 1,
                    b"txBody" => {
                        if let Some(ref mut shape) = current {
                            shape.has_text_body = true;
                            shape.in_text_body = true;
                        }
                    }
                    b"p" => {
                        if let Some(shape) = current.as_mut().filter(|s| s.in_text_body) {
                            shape.start_paragraph();
                        }
                    }
                    b"t" => {
                        if let Some(shape) = current.as_mut().filter(|s| s.in_text_body) {
                            shape.in_run_text = true;
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    _ if skipped_depth > 0 || opaque_depth > 0 => {}
                    ALTERNATE_CONTENT => {}
                    tag if is_opaque_shape(tag) => push_shape(&mut stack, Shape::Other),
                    b"sp" => push_shape(&mut stack, Shape::Other),
                    b"txBody" => {
                        if let Some(ref mut shape) = current {
                            shape.has_text_body = true;
                        }
                    }
                    b"p" => {
                        if let Some(shape) = current.as_mut().filter(|s| s.in_text_body) {
                            shape.start_paragraph();
                        }
                    }
                    b"br" => {
                        if let Some(shape) = current.as_mut().filter(|s| s.in_text_body) {
                            shape.text.push('\n');
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if skipped_depth == 0 => {
                if let Some(shape) = current.as_mut().filter(|s| s.in_run_text) {
                    match e.unescape() {
                        Ok(text) => shape.text.push_str(&text),
                        Err(err) => log::warn!("Bad text escape (skipping run): {}", err),
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    tag if skipped_depth > 0 => {
                        if tag == ALTERNATE_CONTENT {
                            skipped_depth -= 1;
                        }
                    }
                    tag if opaque_depth > 0 => {
                        if is_opaque_shape(tag) {
                            opaque_depth -= 1;
                            if opaque_depth == 0 {
                                push_shape(&mut stack, Shape::Other);
                            }
                        }
                    }
                    b"grpSp" => {
                        if stack.len() > 1 {
                            if let Some(children) = stack.pop() {
                                push_shape(&mut stack, Shape::Group(children));
                            }
                        } else {
                            log::warn!("Unbalanced group shape end (ignoring)");
                        }
                    }
                    b"sp" => {
                        if let Some(shape) = current.take() {
                            push_shape(&mut stack, shape.finish());
                        }
                    }
                    b"txBody" => {
                        if let Some(ref mut shape) = current {
                            shape.in_text_body = false;
                        }
                    }
                    b"t" => {
                        if let Some(ref mut shape) = current {
                            shape.in_run_text = false;
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::PptxParseError(format!(
                    "Malformed slide XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    // Close groups left open by truncated XML.
    while stack.len() > 1 {
        if let Some(children) = stack.pop() {
            push_shape(&mut stack, Shape::Group(children));
        }
    }

    Ok(stack.pop().unwrap_or_default())
}

/// Local name of `mc:AlternateContent`.
const ALTERNATE_CONTENT: &[u8] = b"AlternateContent";

/// Shapes whose content is never treated as a text frame.
fn is_opaque_shape(tag: &[u8]) -> bool {
    matches!(tag, b"pic" | b"graphicFrame" | b"cxnSp" | b"contentPart")
}

fn push_shape(stack: &mut [Vec<Shape>], shape: Shape) {
    if let Some(parent) = stack.last_mut() {
        parent.push(shape);
    }
}

/// Read an attribute value by its qualified name.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// The namespaced `r:id` of an element, whatever its prefix.
fn relationship_id(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| {
            let key = attr.key.as_ref();
            key != b"id" && local_name(key) == b"id"
        })
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Resolve a relationship target against the `ppt/` directory.
fn resolve_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("ppt/{}", target)
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
