use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{Result, anyhow};
use flate2::read::GzDecoder;

use crate::data::document::{Document, Field};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a text file for buffered reading, transparently gunzipping it
/// when it starts with the gzip magic bytes
pub fn open_text_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let mut magic = [0u8; 2];
    let is_gzip = {
        let mut file = File::open(path)?;
        match file.read_exact(&mut magic) {
            Ok(()) => magic == GZIP_MAGIC,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(e),
        }
    };

    let file = File::open(path)?;
    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Call `handle` on every line of `reader` with the line ending removed.
///
/// Lines that are not valid UTF-8 are skipped and counted; the count is
/// returned. I/O errors still propagate.
pub fn for_each_text_line<R, F>(mut reader: R, mut handle: F) -> io::Result<usize>
where
    R: BufRead,
    F: FnMut(usize, &str),
{
    let mut buf = Vec::new();
    let mut line_no = 0;
    let mut invalid = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        match std::str::from_utf8(&buf) {
            Ok(line) => handle(line_no, line.trim_end_matches(['\n', '\r'])),
            Err(_) => {
                log::warn!("Skipping line {}: not valid UTF-8", line_no);
                invalid += 1;
            }
        }
    }
    Ok(invalid)
}

/// Parser for JSON and gzipped JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Validate document structure before featurization
    /// Checks for valid edge indices and consistent token counts
    pub fn validate_document(&self, doc: &Document) -> Result<()> {
        for (sentence_idx, sentence) in doc.sentences.iter().enumerate() {
            let token_count = sentence.num_tokens as usize;

            for field in &sentence.fields {
                match field {
                    Field::TokensField { name, tokens } => {
                        if tokens.len() != token_count {
                            log::warn!(
                                "Document '{}' sentence {}: field '{}' has {} tokens but numTokens is {}",
                                doc.id, sentence_idx, name, tokens.len(), token_count
                            );
                        }
                    }
                    Field::GraphField { edges, .. } => {
                        for (from, to, rel) in edges {
                            if *from as usize >= token_count || *to as usize >= token_count {
                                return Err(anyhow!(
                                    "Document '{}' sentence {}: edge {}->{}:{} out of bounds (token count: {})",
                                    doc.id, sentence_idx, from, to, rel, token_count
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse a JSON file (regular or gzipped)
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> Result<Vec<Document>> {
        let path = file_path.as_ref();
        let mut reader = open_text_reader(path)
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse_str(&content)
            .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    /// Parse from a reader (single document, array of documents or JSONL)
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Vec<Document>> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse_str(&content)
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Document>> {
        if let Ok(docs) = self.parse_json(content) {
            return Ok(docs);
        }

        // Try line-by-line JSON (JSONL format)
        let mut documents = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                let doc: Document = serde_json::from_str(line)?;
                documents.push(doc);
            }
        }
        Ok(documents)
    }

    /// Parse a JSON string
    pub fn parse_json(&self, json_str: &str) -> Result<Vec<Document>> {
        if let Ok(doc) = serde_json::from_str::<Document>(json_str) {
            return Ok(vec![doc]);
        }

        if let Ok(docs) = serde_json::from_str::<Vec<Document>>(json_str) {
            return Ok(docs);
        }

        Err(anyhow!("Failed to parse JSON as single document or array of documents"))
    }
}
