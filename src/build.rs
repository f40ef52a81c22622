use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use serde::Serialize;
use tera::{Context, Tera};
use typst_as_lib::TypstEngine;
use typst_html::HtmlDocument;
use xxhash_rust::xxh3::xxh3_64;

use crate::collection::{Collection, Entry, collect_entries, homepage};
use crate::config::Config;
use crate::consts::{BLOG, HOME, SITE, SOCIALS};
use crate::types::Metadata;

pub const OUTPUT_DIR: &str = "dist";

#[derive(Serialize)]
struct NavLink {
    title: &'static str,
    url: String,
    section: &'static str
}

fn nav_links() -> Vec<NavLink> {
    std::iter::once(NavLink {
        title: HOME.title,
        url: "/index.html".to_string(),
        section: ""
    })
    .chain(Collection::ALL.iter().map(|c| NavLink {
        title: c.metadata().title,
        url: format!("/{}/index.html", c.dir()),
        section: c.dir()
    }))
    .collect()
}

/// State shared by every rendered page.
struct Renderer<'a> {
    tera: Tera,
    config: &'a Config,
    asset_hashes: HashMap<String, String>,
    out_dir: &'a Path,
    minify: bool
}

impl Renderer<'_> {
    fn context(&self, page: Metadata, section: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &SITE);
        context.insert("socials", &SOCIALS);
        context.insert("page", &page);
        context.insert("nav", &nav_links());
        context.insert("base_url", self.config.base());
        context.insert("language", &self.config.language);
        context.insert("current_section", section);
        context.insert("asset_hashes", &self.asset_hashes);
        context
    }

    fn write(
        &self,
        template: &str,
        context: &Context,
        logical: &Path
    ) -> Result<(), Box<dyn Error>> {
        info!("Rendering {}", logical.display());
        let html = self.tera.render(template, context)?;
        let rendered = bust_image_urls(&html, &self.asset_hashes)?.into_bytes();

        let output = if self.minify {
            debug!("Minifying");
            minify_html::minify(&rendered, &minify_html::Cfg::new())
        } else {
            rendered
        };

        let out_path = self.out_dir.join(logical);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Writing file {}", out_path.display());
        fs::write(out_path, output)?;
        Ok(())
    }
}

pub fn run_build(dir: PathBuf, minify: bool) -> Result<(), Box<dyn Error>> {
    let content_path = dir.join("content");
    let output_path = dir.join(OUTPUT_DIR);
    fs::create_dir_all(&output_path)?;

    info!("Reading config");
    let config = Config::load(&dir)?;
    debug!("{:?}", &config);

    let scss_path = dir.join("templates/main.scss");
    if scss_path.exists() {
        info!("Compiling SCSS");
        let css = grass::from_path(scss_path, &grass::Options::default())?;
        fs::write(output_path.join("style.css"), css)?;
    } else {
        info!("No SCSS found, skipping");
    }

    info!("Copying static assets");
    let static_path = dir.join("static");
    if static_path.exists() {
        copy_assets(&static_path, &output_path)?;
    }
    if content_path.exists() {
        copy_assets(&content_path, &output_path)?;
    }
    let asset_hashes = collect_asset_hashes(&output_path, &output_path)?;
    debug!("{:?}", &asset_hashes);

    info!("Initializing Tera");
    let tera = Tera::new(
        dir.join("templates/**/*.html")
            .to_str()
            .ok_or("non UTF-8 template path")?
    )?;

    info!("Initializing Typst engine");
    let engine = TypstEngine::builder()
        .with_file_system_resolver(dir.clone())
        .fonts(typst_assets::fonts())
        .build();

    info!("Compiling content");
    let mut cache: HashMap<PathBuf, HtmlDocument> = HashMap::new();
    let mut collections: HashMap<Collection, Vec<Entry>> = HashMap::new();
    for collection in Collection::ALL {
        let entries = collect_entries(&dir, collection, &engine, &mut cache)?;
        info!("{} {} entries", entries.len(), collection.dir());
        collections.insert(collection, entries);
    }

    info!("Generating RSS feed");
    let posts = collections.get(&Collection::Blog).map(Vec::as_slice).unwrap_or_default();
    generate_rss(posts, &config, &output_path)?;

    let renderer = Renderer {
        tera,
        config: &config,
        asset_hashes,
        out_dir: &output_path,
        minify
    };

    info!("Processing templates");
    let mut context = renderer.context(HOME, "");
    for collection in Collection::ALL {
        let entries = collections.get(&collection).map(Vec::as_slice).unwrap_or_default();
        context.insert(collection.dir(), homepage(entries, collection));
    }
    renderer.write("home.html", &context, Path::new("index.html"))?;

    for collection in Collection::ALL {
        let entries = collections.get(&collection).map(Vec::as_slice).unwrap_or_default();
        let mut context = renderer.context(collection.metadata(), collection.dir());
        context.insert("collection", &collection);
        context.insert("entries", entries);
        renderer.write(
            "listing.html",
            &context,
            &Path::new(collection.dir()).join("index.html")
        )?;

        for entry in entries {
            let doc = cache
                .remove(&entry.source)
                .ok_or_else(|| format!("no cached doc for {}", entry.source.display()))?;
            let html = typst_html::html(&doc).map_err(|e| format!("{:?}", e))?;
            let body = extract_body_content(&html)?;

            let mut context = renderer.context(collection.metadata(), collection.dir());
            context.insert("collection", &collection);
            context.insert("entry", entry);
            context.insert("content", &body);
            renderer.write(
                "entry.html",
                &context,
                &Path::new(collection.dir()).join(format!("{}.html", entry.slug))
            )?;
        }
    }

    info!("Build complete");
    Ok(())
}

pub fn clean(dir: &Path) -> Result<(), Box<dyn Error>> {
    let output_path = dir.join(OUTPUT_DIR);
    info!("Removing directory: {}", output_path.display());
    fs::remove_dir_all(&output_path)?;
    Ok(())
}

fn generate_rss(posts: &[Entry], config: &Config, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let base = config.base();

    let items = posts
        .iter()
        .filter_map(|p| match &p.pub_date {
            Some(date) => Some((p, date)),
            None => {
                warn!("Post {} has no date, excluded from RSS", p.url);
                None
            }
        })
        .map(|(p, date)| {
            format!(
                r#"    <item>
      <title>{}</title>
      <link>{}{}</link>
      <guid>{}{}</guid>
      <description>{}</description>
      <pubDate>{}</pubDate>
    </item>"#,
                escape_xml(&p.title),
                base,
                p.url,
                base,
                p.url,
                escape_xml(p.description.as_deref().unwrap_or_default()),
                date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let rss = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    <language>{}</language>
{}
  </channel>
</rss>"#,
        escape_xml(&format!("{} - {}", SITE.name, BLOG.title)),
        base,
        escape_xml(BLOG.description),
        escape_xml(&config.language),
        items,
    );

    fs::write(out_dir.join("rss.xml"), rss)?;
    Ok(())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn extract_body_content(html: &str) -> Result<String, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body").map_err(|e| format!("{:?}", e))?;

    Ok(document
        .select(&selector)
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_else(|| html.to_string()))
}

fn hash_file(path: &Path) -> Result<String, Box<dyn Error>> {
    let contents = fs::read(path)?;
    Ok(format!("{:x}", xxh3_64(&contents)))
}

fn collect_asset_hashes(
    dir: &Path,
    base: &Path
) -> Result<HashMap<String, String>, Box<dyn Error>> {
    let mut hashes = HashMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            hashes.extend(collect_asset_hashes(&path, base)?);
        } else if !matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("html") | Some("xml") | Some("typ")
        ) {
            let rel = path.strip_prefix(base)?;
            let url = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
            hashes.insert(url, hash_file(&path)?);
        }
    }
    Ok(hashes)
}

fn bust_image_urls(
    html: &str,
    asset_hashes: &HashMap<String, String>
) -> Result<String, Box<dyn Error>> {
    let re = Regex::new(r#"<img([^>]*?)src="(/[^"?]+)"([^>]*?)>"#)?;
    Ok(re
        .replace_all(html, |caps: &Captures| match asset_hashes.get(&caps[2]) {
            Some(hash) => format!(r#"<img{}src="{}?v={}"{}>"#, &caps[1], &caps[2], hash, &caps[3]),
            None => caps[0].to_string()
        })
        .to_string())
}

fn copy_assets(src: &Path, dst: &Path) -> Result<(), Box<dyn Error>> {
    for entry in fs::read_dir(src)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .ok_or_else(|| format!("no file name for {}", path.display()))?;
        if path.is_dir() {
            let dest_dir = dst.join(name);
            fs::create_dir_all(&dest_dir)?;
            copy_assets(&path, &dest_dir)?;
        } else {
            match path.extension().and_then(|s| s.to_str()) {
                Some("typ") | Some("toml") | Some("scss") => {}
                _ => {
                    fs::copy(&path, dst.join(name))?;
                }
            }
        }
    }
    Ok(())
}
