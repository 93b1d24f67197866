//! Read-only Q&A corpus loaded once at startup from JSON or JSONL files.

use anyhow::{bail, Context, Result};
use qa_core::{AnswerSignal, Document, PreparedDocument};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ThreadRecord {
    /// Title, body and tags joined into one searchable text.
    pub fn document(&self) -> Document {
        let mut fields = vec![self.title.as_str(), self.content.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        Document::from_fields(self.id.clone(), &fields)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl MaterialRecord {
    pub fn document(&self) -> Document {
        Document::from_fields(self.id.clone(), &[self.title.as_str(), self.content.as_str()])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnswerRecord {
    pub id: String,
    pub thread_id: String,
    pub confidence_score: f32,
    #[serde(default)]
    pub instructor_endorsed: bool,
}

/// Records plus their extracted keywords. Keyword vectors are aligned with
/// the record vectors by position.
#[derive(Debug, Default)]
pub struct Corpus {
    pub threads: Vec<ThreadRecord>,
    pub thread_keywords: Vec<PreparedDocument>,
    pub materials: Vec<MaterialRecord>,
    pub material_keywords: Vec<PreparedDocument>,
    /// thread id -> signal of its AI answer
    pub signals: HashMap<String, AnswerSignal>,
    thread_pos: HashMap<String, usize>,
    material_pos: HashMap<String, usize>,
}

impl Corpus {
    pub fn from_records(threads: Vec<ThreadRecord>, materials: Vec<MaterialRecord>, answers: Vec<AiAnswerRecord>) -> Self {
        let thread_keywords = threads.iter().map(|t| PreparedDocument::from_document(&t.document())).collect();
        let material_keywords = materials.iter().map(|m| PreparedDocument::from_document(&m.document())).collect();
        let thread_pos = threads.iter().enumerate().map(|(i, t)| (t.id.clone(), i)).collect();
        let material_pos = materials.iter().enumerate().map(|(i, m)| (m.id.clone(), i)).collect();
        // later answers for the same thread replace earlier ones
        let signals = answers
            .into_iter()
            .map(|a| (a.thread_id, AnswerSignal { confidence: a.confidence_score, instructor_endorsed: a.instructor_endorsed }))
            .collect();
        Self { threads, thread_keywords, materials, material_keywords, signals, thread_pos, material_pos }
    }

    /// Load `threads`, `materials` and `ai-answers` from `dir`. Only threads are required.
    pub fn load(dir: &Path) -> Result<Self> {
        let threads: Vec<ThreadRecord> = load_records(dir, "threads")?
            .with_context(|| format!("no threads.json or threads.jsonl in {}", dir.display()))?;
        let materials: Vec<MaterialRecord> = load_records(dir, "materials")?.unwrap_or_default();
        let answers: Vec<AiAnswerRecord> = load_records(dir, "ai-answers")?.unwrap_or_default();
        tracing::info!(
            threads = threads.len(),
            materials = materials.len(),
            ai_answers = answers.len(),
            dir = %dir.display(),
            "loaded corpus"
        );
        Ok(Self::from_records(threads, materials, answers))
    }

    pub fn thread(&self, id: &str) -> Option<&ThreadRecord> {
        self.thread_pos.get(id).map(|&i| &self.threads[i])
    }

    pub fn material(&self, id: &str) -> Option<&MaterialRecord> {
        self.material_pos.get(id).map(|&i| &self.materials[i])
    }

    /// Thread keywords, restricted to one course when given.
    pub fn thread_candidates<'a>(&'a self, course_id: Option<&'a str>) -> impl Iterator<Item = &'a PreparedDocument> + 'a {
        self.threads
            .iter()
            .zip(self.thread_keywords.iter())
            .filter(move |(t, _)| course_id.map_or(true, |c| t.course_id == c))
            .map(|(_, k)| k)
    }

    pub fn material_candidates<'a>(&'a self, course_id: Option<&'a str>) -> impl Iterator<Item = &'a PreparedDocument> + 'a {
        self.materials
            .iter()
            .zip(self.material_keywords.iter())
            .filter(move |(m, _)| course_id.map_or(true, |c| m.course_id == c))
            .map(|(_, k)| k)
    }
}

/// `{stem}.json` (array or single object) or `{stem}.jsonl`; `None` when neither exists.
fn load_records<T: DeserializeOwned>(dir: &Path, stem: &str) -> Result<Option<Vec<T>>> {
    let json = dir.join(format!("{stem}.json"));
    if json.is_file() {
        return read_json(&json).map(Some);
    }
    let jsonl = dir.join(format!("{stem}.jsonl"));
    if jsonl.is_file() {
        return read_jsonl(&jsonl).map(Some);
    }
    Ok(None)
}

fn read_json<T: DeserializeOwned>(file: &Path) -> Result<Vec<T>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", file.display()))?;
    let records = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?,
        obj @ serde_json::Value::Object(_) => vec![serde_json::from_value(obj)?],
        other => bail!("{}: expected an array or object of records, found {}", file.display(), other),
    };
    Ok(records)
}

fn read_jsonl<T: DeserializeOwned>(file: &Path) -> Result<Vec<T>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let mut records = Vec::new();
    for (n, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let record = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        records.push(record);
    }
    Ok(records)
}
