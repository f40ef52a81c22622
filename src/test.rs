use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use clap::Parser;
use env_logger::Env;

use crate::{Cli, Commands};

static BUILD: OnceLock<Result<(), String>> = OnceLock::new();

fn test_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test")
}

fn build_once() {
    let result = BUILD.get_or_init(|| {
        let _ = env_logger::Builder::from_env(
            Env::default().default_filter_or("rustaceanrob_site=debug,warn")
        )
        .is_test(true)
        .try_init();
        crate::build::run_build(test_dir(), false).map_err(|e| e.to_string())
    });
    if let Err(e) = result {
        panic!("Build should succeed: {}", e);
    }
}

fn built(path: &str) -> String {
    build_once();
    let file = test_dir().join("dist").join(path);
    fs::read_to_string(&file).unwrap_or_else(|e| panic!("{} unreadable: {}", file.display(), e))
}

#[test]
fn test_build() {
    built("index.html");
    for file in ["style.css", "rss.xml", "avatar.svg", "blog/index.html", "work/index.html"] {
        assert!(test_dir().join("dist").join(file).exists(), "{} should exist", file);
    }
    for source in ["blog/draft.typ", "projects/kyoto.typ"] {
        assert!(!test_dir().join("dist").join(source).exists(), "{} was copied", source);
    }
}

#[test]
fn home_shows_identity_and_socials_in_order() {
    let home = built("index.html");
    assert!(home.contains("<title>Home | @rustaceanrob</title>"));
    assert!(home.contains("The home page to view all my work."));
    assert!(home.contains("mailto:rob@2140.dev"));
    let github = home.find("https://github.com/rustaceanrob").expect("github link");
    let linkedin = home.find("https://www.linkedin.com/in/robnetzke").expect("linkedin link");
    assert!(github < linkedin, "socials out of declaration order");
}

#[test]
fn home_limits_each_collection() {
    let home = built("index.html");
    assert!(home.contains("/blog/hello.html"));
    assert!(!home.contains("Unfinished thoughts"));
    assert!(home.contains("Protocol engineer"));
    assert!(home.contains("Intern"));
    assert!(!home.contains("Teaching assistant"));
    assert!(home.contains("Kyoto"));
    assert!(home.contains("NOTES"));
}

#[test]
fn listings_hold_every_entry_newest_first() {
    let work = built("work/index.html");
    assert!(work.contains("<title>Work | @rustaceanrob</title>"));
    let order: Vec<_> = ["Protocol engineer", "Intern", "Teaching assistant"]
        .iter()
        .map(|t| work.find(t).unwrap_or_else(|| panic!("{} missing", t)))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));

    let blog = built("blog/index.html");
    let hello = blog.find("Hello, world").expect("dated post");
    let draft = blog.find("Unfinished thoughts").expect("undated post");
    assert!(hello < draft);
    assert!(blog.contains("Why this site exists."));
}

#[test]
fn entries_render_typst_bodies() {
    let post = built("blog/hello.html");
    assert!(post.contains("light clients"));
    assert!(post.contains("<time>2024-05-01</time>"));
    assert!(post.contains(r#"class="active""#));
    assert_eq!(post.matches("<body").count(), 1, "typst body nested");
}

#[test]
fn known_images_are_cache_busted() {
    assert!(built("index.html").contains(r#"src="/avatar.svg?v="#));
}

#[test]
fn rss_lists_dated_posts() {
    let rss = built("rss.xml");
    assert!(rss.contains("<link>https://rustaceanrob.example/blog/hello.html</link>"));
    assert!(rss.contains("<pubDate>Wed, 01 May 2024 00:00:00 +0000</pubDate>"));
    assert!(rss.contains("<language>en-us</language>"));
    assert!(!rss.contains("draft.html"));
}

#[test]
fn cli_defaults() {
    let cli = Cli::try_parse_from(["rustaceanrob-site", "build", "-m"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Build { minify: true, ref dir } if dir == &PathBuf::from("./")
    ));
    let cli = Cli::try_parse_from(["rustaceanrob-site", "clean", "--dir", "site"]).unwrap();
    assert!(matches!(cli.command, Commands::Clean { ref dir } if dir == &PathBuf::from("site")));
    assert!(Cli::try_parse_from(["rustaceanrob-site", "deploy"]).is_err());
}
