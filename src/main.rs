//! BlogBuilder - command line front end for the post store
//!
//! Lists, shows and edits posts without a GUI.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blogbuilder::config::AppConfig;
use blogbuilder::post::media::web_path;
use blogbuilder::{
    EditSession, ImageElement, MediaLocation, Post, PostStore, TextElement, VideoElement,
};

const USAGE: &str = "usage: blogbuilder <command>

commands:
  list                                  list saved posts
  show <filename>                       print a post's title, summary and elements
  html <filename>                       print a post's HTML
  new <title> [markdown]                create a post
  add-text <filename> <markdown>        append text to a post
  add-image <filename> <local|internet> <src>
  add-video <filename> <local|internet> <src>
  delete <filename>                     delete a post
  staging                               show the staged post
  reconcile                             drop index entries whose file is missing";

fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();

    // Initialize logging
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::INFO);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let mut store = PostStore::open(config.storage_dir())
        .with_context(|| format!("Failed to open post store: {}", config.storage_dir().display()))?;

    match args.as_slice() {
        ["list"] => list(&store, &config),
        ["show", filename] => show(&store, filename),
        ["html", filename] => {
            let post = load(&store, filename)?;
            println!("{}", post.render());
            Ok(())
        }
        ["new", title, rest @ ..] => {
            let mut session = EditSession::begin(&mut store, &Post::new())?;
            session.set_title(*title)?;
            if !rest.is_empty() {
                session.add(TextElement::from_markdown(&rest.join(" ")))?;
            }
            let post = session.commit()?;
            println!("{}", post.filename());
            Ok(())
        }
        ["add-text", filename, rest @ ..] if !rest.is_empty() => {
            let post = load(&store, filename)?;
            let mut session = EditSession::begin(&mut store, &post)?;
            session.add(TextElement::from_markdown(&rest.join(" ")))?;
            session.commit()?;
            Ok(())
        }
        ["add-image", filename, location, src] => {
            let location = parse_location(location)?;
            let mut image = ImageElement::new(location, &media_src(location, src));
            image.set_width(config.default_media_width.clone());
            add_to(&mut store, filename, image)
        }
        ["add-video", filename, location, src] => {
            let location = parse_location(location)?;
            let mut video = VideoElement::new(location, &media_src(location, src));
            video.set_width(config.default_media_width.clone());
            add_to(&mut store, filename, video)
        }
        ["delete", filename] => {
            let post = load(&store, filename)?;
            if !store.delete(&post)? {
                bail!("{} is not in the post list", filename);
            }
            Ok(())
        }
        ["staging"] => match store.get_staging() {
            Some(post) => {
                print_post(&post);
                Ok(())
            }
            None => bail!("No staged post"),
        },
        ["reconcile"] => {
            for filename in store.reconcile()? {
                println!("dropped {}", filename);
            }
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

fn load(store: &PostStore, filename: &str) -> Result<Post> {
    store
        .try_load(filename)
        .with_context(|| format!("Failed to load post: {}", filename))
}

fn parse_location(location: &str) -> Result<MediaLocation> {
    match location {
        "local" => Ok(MediaLocation::Local),
        "internet" => Ok(MediaLocation::Internet),
        other => bail!("Unknown media location: {} (expected local or internet)", other),
    }
}

fn media_src(location: MediaLocation, src: &str) -> String {
    match location {
        MediaLocation::Local => src.to_string(),
        MediaLocation::Internet => web_path(src),
    }
}

fn add_to(
    store: &mut PostStore,
    filename: &str,
    element: impl Into<blogbuilder::Element>,
) -> Result<()> {
    let post = load(store, filename)?;
    let mut session = EditSession::begin(store, &post)?;
    session.add(element)?;
    session.commit()?;
    Ok(())
}

fn list(store: &PostStore, config: &AppConfig) -> Result<()> {
    println!("{}", config.blog_title);
    for summary in store.summaries() {
        println!("  {:<24} {}", summary.filename, summary.title);
        if !summary.summary.is_empty() {
            println!("  {:<24} {}", "", summary.summary);
        }
    }
    Ok(())
}

fn show(store: &PostStore, filename: &str) -> Result<()> {
    let post = load(store, filename)?;
    print_post(&post);
    Ok(())
}

fn print_post(post: &Post) {
    println!("{} ({})", post.title(), post.filename());
    println!("{}", post.summary());
    for (i, element) in post.element_list().iter().enumerate() {
        println!("  [{}] {}", i, element.kind().name());
    }
}
