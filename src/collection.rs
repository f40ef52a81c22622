use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use typst_as_lib::TypstEngine;
use typst_html::HtmlDocument;

use crate::consts::{BLOG, PROJECTS, SITE, WORK};
use crate::types::Metadata;

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"
];

/// A content collection, each backed by `content/<dir>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Blog,
    Work,
    Projects
}

impl Collection {
    pub const ALL: [Self; 3] = [Self::Blog, Self::Work, Self::Projects];

    pub fn dir(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Work => "work",
            Self::Projects => "projects"
        }
    }

    pub fn metadata(self) -> Metadata {
        match self {
            Self::Blog => BLOG,
            Self::Work => WORK,
            Self::Projects => PROJECTS
        }
    }

    pub fn homepage_count(self) -> usize {
        match self {
            Self::Blog => SITE.num_posts_on_homepage,
            Self::Work => SITE.num_works_on_homepage,
            Self::Projects => SITE.num_projects_on_homepage
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: String,
    pub slug: String,
    pub url: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// RFC 822, for the feed
    pub pub_date: Option<String>,
    #[serde(skip)]
    pub source: PathBuf
}

/// Compiles every `.typ` file of `collection` under `root/content/`, caching
/// the documents by their root-relative source path.
pub fn collect_entries(
    root: &Path,
    collection: Collection,
    engine: &TypstEngine,
    cache: &mut HashMap<PathBuf, HtmlDocument>
) -> Result<Vec<Entry>, Box<dyn Error>> {
    let dir = root.join("content").join(collection.dir());
    if !dir.is_dir() {
        warn!("No {} directory, collection is empty", dir.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("typ") {
            continue;
        }
        let rel = path.strip_prefix(root)?.to_path_buf();
        let source = rel
            .to_str()
            .ok_or_else(|| format!("non UTF-8 path {}", rel.display()))?
            .replace('\\', "/");
        debug!("Compiling {}", source);

        let doc: HtmlDocument = engine
            .compile(source.as_str())
            .output
            .map_err(|e| format!("{}: {:?}", source, e))?;

        let slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (date, pub_date) = extract_dates(&doc);
        entries.push(Entry {
            title: extract_title(&doc, &slug.to_uppercase()),
            url: format!("/{}/{}.html", collection.dir(), slug),
            description: doc.info.description.as_ref().map(|d| d.to_string()),
            slug,
            date,
            pub_date,
            source: rel.clone()
        });
        cache.insert(rel, doc);
    }
    sort_entries(&mut entries);
    Ok(entries)
}

/// Newest first, undated last, ties broken by title.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
}

/// The leading entries shown on the home page for `collection`.
pub fn homepage(entries: &[Entry], collection: Collection) -> &[Entry] {
    &entries[..entries.len().min(collection.homepage_count())]
}

fn extract_dates(doc: &HtmlDocument) -> (Option<String>, Option<String>) {
    let Some(d) = doc.info.date.custom().flatten() else {
        return (None, None);
    };
    let (Some(year), Some(month), Some(day)) = (d.year(), d.month(), d.day()) else {
        return (None, None);
    };
    let iso = format!("{:04}-{:02}-{:02}", year, month, day);
    let rfc = format!(
        "{}, {:02} {} {} 00:00:00 +0000",
        DAYS[weekday(year, month, day)],
        day,
        MONTHS[usize::from(month) - 1],
        year
    );
    (Some(iso), Some(rfc))
}

/// Day of the week, 0 for Monday, via Sakamoto's method.
fn weekday(year: i32, month: u8, day: u8) -> usize {
    const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if month < 3 { year - 1 } else { year };
    let from_sunday = (y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        + OFFSETS[usize::from(month) - 1]
        + i32::from(day))
    .rem_euclid(7);
    ((from_sunday + 6) % 7) as usize
}

fn extract_title(doc: &HtmlDocument, default: &str) -> String {
    doc.info
        .title
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| default.to_string())
}
